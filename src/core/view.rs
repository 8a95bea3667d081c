//! Module selection for the main viewport

use thiserror::Error;

/// Panels the viewport can show; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModuleId {
    /// Market data
    #[default]
    Pulse,
    /// Narrative generator
    Strike,
    /// Full audit trail
    Logs,
    /// Secure enclave panel
    Tee,
}

impl ModuleId {
    /// Sidebar order
    pub const ALL: [ModuleId; 4] = [
        ModuleId::Pulse,
        ModuleId::Strike,
        ModuleId::Logs,
        ModuleId::Tee,
    ];

    /// Wire identifier (e.g. "PULSE")
    pub fn id(&self) -> &'static str {
        match self {
            ModuleId::Pulse => "PULSE",
            ModuleId::Strike => "STRIKE",
            ModuleId::Logs => "LOGS",
            ModuleId::Tee => "TEE",
        }
    }

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            ModuleId::Pulse => "Pulse",
            ModuleId::Strike => "Strike",
            ModuleId::Logs => "Logs",
            ModuleId::Tee => "TEE",
        }
    }

    fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|m| m == self)
            .unwrap_or_default()
    }

    /// Next module in sidebar order, wrapping around
    pub fn next(&self) -> ModuleId {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous module in sidebar order, wrapping around
    pub fn prev(&self) -> ModuleId {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }

    /// Module for a 1-based sidebar slot
    pub fn from_slot(slot: usize) -> Option<ModuleId> {
        slot.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Identifier outside the fixed module set
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown module identifier: '{0}'")]
pub struct UnknownModule(pub String);

impl std::str::FromStr for ModuleId {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleId::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}

/// Which panel the viewport shows
///
/// Holding a single `ModuleId` makes "exactly one active" structural:
/// there is no representable state with zero or two active modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    active: ModuleId,
}

impl ViewState {
    pub fn new(active: ModuleId) -> Self {
        Self { active }
    }

    pub fn active(&self) -> ModuleId {
        self.active
    }

    pub fn is_active(&self, module: ModuleId) -> bool {
        self.active == module
    }

    /// Unconditionally switch to `module`
    pub fn select(&mut self, module: ModuleId) {
        self.active = module;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_count(view: &ViewState) -> usize {
        ModuleId::ALL.iter().filter(|m| view.is_active(**m)).count()
    }

    #[test]
    fn test_default_is_pulse() {
        let view = ViewState::default();
        assert_eq!(view.active(), ModuleId::Pulse);
        assert_eq!(active_count(&view), 1);
    }

    #[test]
    fn test_select_sequence_keeps_one_active() {
        let mut view = ViewState::default();
        for module in [ModuleId::Strike, ModuleId::Pulse, ModuleId::Strike] {
            view.select(module);
            assert_eq!(view.active(), module);
            assert_eq!(active_count(&view), 1);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("strike".parse::<ModuleId>(), Ok(ModuleId::Strike));
        assert_eq!("TEE".parse::<ModuleId>(), Ok(ModuleId::Tee));
        assert_eq!(
            "VAULT".parse::<ModuleId>(),
            Err(UnknownModule("VAULT".to_string()))
        );
    }

    #[test]
    fn test_next_prev_wrap() {
        assert_eq!(ModuleId::Tee.next(), ModuleId::Pulse);
        assert_eq!(ModuleId::Pulse.prev(), ModuleId::Tee);
        assert_eq!(ModuleId::Strike.next(), ModuleId::Logs);
    }

    #[test]
    fn test_from_slot() {
        assert_eq!(ModuleId::from_slot(1), Some(ModuleId::Pulse));
        assert_eq!(ModuleId::from_slot(4), Some(ModuleId::Tee));
        assert_eq!(ModuleId::from_slot(0), None);
        assert_eq!(ModuleId::from_slot(5), None);
    }
}
