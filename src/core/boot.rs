//! Boot sequence: loading → ready
//!
//! Two mechanisms exist, one per presentation variant:
//! - `Delay`: a single deferred flip after a fixed wait
//! - `Progress`: a 0–100 counter advanced on a fixed tick, flipping at 100
//!
//! Both fire once per mount. Writes go through [`ScreenHandle::update`], so a
//! torn-down screen stops the sequence at the next tick.

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::config::{TimingConfig, Variant};

use super::screen::ScreenHandle;

/// Boot progress as seen by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootState {
    pub booted: bool,
    /// 0..=100
    pub progress: u8,
}

impl BootState {
    /// Advance the counter by `step`, saturating at 100
    ///
    /// Returns true when this call reached 100.
    pub fn advance(&mut self, step: u8) -> bool {
        if self.progress >= 100 {
            return false;
        }
        self.progress = self.progress.saturating_add(step).min(100);
        self.progress == 100
    }

    pub fn complete(&mut self) {
        self.progress = 100;
        self.booted = true;
    }
}

/// How the loading screen reaches ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    /// One deferred transition after the given delay
    Delay(Duration),
    /// Counter advanced by `step` every `tick`
    Progress { tick: Duration, step: u8 },
}

impl BootMode {
    pub fn for_variant(variant: Variant, timing: &TimingConfig) -> Self {
        match variant {
            Variant::Terminal => BootMode::Delay(timing.boot_delay()),
            Variant::Sentinel => BootMode::Progress {
                tick: timing.progress_tick(),
                step: timing.progress_step.max(1),
            },
        }
    }

    /// Time from mount until the screen reports ready
    pub fn expected_duration(&self) -> Duration {
        match *self {
            BootMode::Delay(delay) => delay,
            BootMode::Progress { tick, step } => {
                let ticks = 100u32.div_ceil(u32::from(step.max(1)));
                tick * ticks
            }
        }
    }
}

/// Drives a screen from loading to ready
#[derive(Debug, Clone, Copy)]
pub struct BootSequencer {
    mode: BootMode,
}

impl BootSequencer {
    pub fn new(mode: BootMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> BootMode {
        self.mode
    }

    /// Run to completion (or until the screen is torn down)
    pub async fn run(self, screen: ScreenHandle) {
        match self.mode {
            BootMode::Delay(delay) => {
                tokio::time::sleep(delay).await;
                screen.update(|state| state.finish_boot());
            }
            BootMode::Progress { tick, step } => {
                let mut ticker = interval_at(Instant::now() + tick, tick);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

                loop {
                    ticker.tick().await;
                    let reached = screen.update(|state| {
                        if state.boot.advance(step) {
                            state.finish_boot();
                            true
                        } else {
                            false
                        }
                    });

                    match reached {
                        Some(true) => break,
                        Some(false) => continue,
                        None => {
                            debug!(event_type = "BOOT_ABANDONED", "Screen gone before boot completed");
                            return;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_saturates_at_100() {
        let mut boot = BootState::default();
        for _ in 0..49 {
            assert!(!boot.advance(2));
        }
        assert_eq!(boot.progress, 98);
        assert!(boot.advance(2));
        assert_eq!(boot.progress, 100);
        // Already full: no second completion
        assert!(!boot.advance(2));
    }

    #[test]
    fn test_advance_uneven_step() {
        let mut boot = BootState::default();
        let mut ticks = 0;
        while !boot.advance(30) {
            ticks += 1;
        }
        assert_eq!(ticks, 3);
        assert_eq!(boot.progress, 100);
    }

    #[test]
    fn test_mode_for_variant() {
        let timing = TimingConfig::default();
        assert_eq!(
            BootMode::for_variant(Variant::Terminal, &timing),
            BootMode::Delay(Duration::from_millis(2000))
        );
        assert_eq!(
            BootMode::for_variant(Variant::Sentinel, &timing),
            BootMode::Progress {
                tick: Duration::from_millis(50),
                step: 2
            }
        );
    }

    #[test]
    fn test_expected_duration() {
        assert_eq!(
            BootMode::Delay(Duration::from_millis(2000)).expected_duration(),
            Duration::from_millis(2000)
        );
        let progress = BootMode::Progress {
            tick: Duration::from_millis(50),
            step: 2,
        };
        assert_eq!(progress.expected_duration(), Duration::from_millis(2500));
        let uneven = BootMode::Progress {
            tick: Duration::from_millis(10),
            step: 30,
        };
        assert_eq!(uneven.expected_duration(), Duration::from_millis(40));
    }
}
