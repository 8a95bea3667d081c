//! Per-screen state container and controller
//!
//! `ScreenState` holds everything the dashboard renders: active module, boot
//! progress, audit trail, market snapshot, narrative and enclave state. It is
//! owned by a `Screen`, never global, so several screens can coexist (and be
//! tested in isolation).
//!
//! # Teardown
//! Deferred work only touches state through [`ScreenHandle::update`], which
//! checks the screen's cancellation token while holding the state lock.
//! [`Screen::teardown`] cancels that token under the same lock, so once it
//! returns no timer, fetch or user action can mutate the state again.

use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, Variant};

use super::boot::{BootMode, BootSequencer, BootState};
use super::enclave::{run_unlock, EnclaveState};
use super::errors::FetchResult;
use super::log_buffer::LogRingBuffer;
use super::market::{MarketDataSource, MarketSnapshot};
use super::narrative::{is_valid_trend, synthesize};
use super::task::TaskSet;
use super::view::{ModuleId, ViewState};

// =============================================================================
// Audit Messages
// =============================================================================

pub const MSG_BOOT_READY: &str = "SYSTEM_READY: All protocols operational.";
pub const MSG_SYNC_START: &str = "SYNC: Fetching real-time market data...";
pub const MSG_SYNC_OK: &str = "DATA: Market pulse synchronized.";
pub const MSG_SYNC_FAILED: &str = "ERROR: Data sync failed.";
pub const MSG_STRIKE_DONE: &str = "SUCCESS: Strike narrative established.";
pub const MSG_UNLOCK_START: &str = "TEE: Unlock sequence initiated...";
pub const MSG_UNLOCK_DONE: &str = "TEE: Enclave unlocked. Key isolation active.";

/// Maximum characters accepted in the trend input
pub const MAX_TREND_LEN: usize = 64;

// =============================================================================
// ScreenState
// =============================================================================

/// Everything one dashboard screen displays
#[derive(Debug, Clone)]
pub struct ScreenState {
    pub variant: Variant,
    pub view: ViewState,
    pub boot: BootState,
    pub logs: LogRingBuffer,
    /// Absent until the first successful fetch
    pub snapshot: Option<MarketSnapshot>,
    /// Fetches started but not yet resolved
    pub syncs_in_flight: usize,
    pub trend_input: String,
    pub is_striking: bool,
    /// Absent until the first strike completes
    pub narrative: Option<String>,
    pub enclave: EnclaveState,
}

impl ScreenState {
    pub fn new(variant: Variant, log_capacity: usize) -> Self {
        Self {
            variant,
            view: ViewState::default(),
            boot: BootState::default(),
            logs: LogRingBuffer::seeded(log_capacity),
            snapshot: None,
            syncs_in_flight: 0,
            trend_input: String::new(),
            is_striking: false,
            narrative: None,
            enclave: EnclaveState::default(),
        }
    }

    /// Append one audit line
    pub fn log(&mut self, message: impl Into<String>) {
        self.logs.append(message);
    }

    pub fn active_module(&self) -> ModuleId {
        self.view.active()
    }

    pub fn is_syncing(&self) -> bool {
        self.syncs_in_flight > 0
    }

    /// Flip to ready; only the first call has an effect
    pub fn finish_boot(&mut self) {
        if self.boot.booted {
            return;
        }
        self.boot.complete();
        self.log(MSG_BOOT_READY);
    }

    pub fn begin_sync(&mut self) {
        self.syncs_in_flight += 1;
        self.log(MSG_SYNC_START);
    }

    /// Record a fetch outcome
    ///
    /// Success replaces the snapshot wholesale. Failure leaves the previous
    /// snapshot (or its absence) untouched and appends exactly one line.
    pub fn apply_fetch(&mut self, outcome: FetchResult<MarketSnapshot>) {
        self.syncs_in_flight = self.syncs_in_flight.saturating_sub(1);
        match outcome {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.log(MSG_SYNC_OK);
            }
            Err(e) => {
                warn!(event_type = "MARKET_SYNC_FAILED", error = %e, "Market data sync failed");
                self.log(MSG_SYNC_FAILED);
            }
        }
    }

    /// Start a strike from the current trend input
    ///
    /// Returns the trend to synthesize from, or `None` when the input is empty
    /// or a strike is already running (no log line, no state change).
    ///
    /// Whitespace-only input counts as empty, and surrounding whitespace is
    /// trimmed from the trend before it reaches the log line and the narrative.
    pub fn begin_strike(&mut self) -> Option<String> {
        if self.is_striking || !is_valid_trend(&self.trend_input) {
            return None;
        }
        let trend = self.trend_input.trim().to_string();
        self.is_striking = true;
        self.log(format!("STRIKE: Synthesizing narrative for \"{}\"...", trend));
        Some(trend)
    }

    pub fn finish_strike(&mut self, narrative: String) {
        self.narrative = Some(narrative);
        self.is_striking = false;
        self.log(MSG_STRIKE_DONE);
    }

    /// Start the unlock animation; sentinel variant only, from `Locked` only
    pub fn begin_unlock(&mut self) -> bool {
        if self.variant != Variant::Sentinel || self.enclave != EnclaveState::Locked {
            return false;
        }
        self.enclave = EnclaveState::Unlocking;
        self.log(MSG_UNLOCK_START);
        true
    }

    pub fn finish_unlock(&mut self) {
        if self.enclave != EnclaveState::Unlocking {
            return;
        }
        self.enclave = EnclaveState::Unlocked;
        self.log(MSG_UNLOCK_DONE);
    }

    /// Whether the TEE panel shows attestation as verified
    pub fn enclave_verified(&self) -> bool {
        match self.variant {
            Variant::Terminal => true,
            Variant::Sentinel => self.enclave == EnclaveState::Unlocked,
        }
    }

    pub fn push_trend_char(&mut self, c: char) {
        if !c.is_control() && self.trend_input.chars().count() < MAX_TREND_LEN {
            self.trend_input.push(c);
        }
    }

    pub fn pop_trend_char(&mut self) {
        self.trend_input.pop();
    }
}

/// Screen state shared between the controller and its deferred tasks
pub type SharedScreenState = Arc<Mutex<ScreenState>>;

// =============================================================================
// ScreenHandle
// =============================================================================

/// Guarded write access to a screen's state
#[derive(Debug, Clone)]
pub struct ScreenHandle {
    state: SharedScreenState,
    token: CancellationToken,
}

impl ScreenHandle {
    pub fn new(state: SharedScreenState, token: CancellationToken) -> Self {
        Self { state, token }
    }

    /// Apply `f` unless the screen has been torn down
    ///
    /// Returns `None` (and runs nothing) after teardown or if the lock is
    /// poisoned.
    pub fn update<R>(&self, f: impl FnOnce(&mut ScreenState) -> R) -> Option<R> {
        let mut state = self.state.lock().ok()?;
        if self.token.is_cancelled() {
            return None;
        }
        Some(f(&mut state))
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }
}

// =============================================================================
// Screen
// =============================================================================

/// One mounted dashboard: state, deferred work and the price source
pub struct Screen {
    id: Uuid,
    config: AppConfig,
    state: SharedScreenState,
    tasks: TaskSet,
    source: Arc<dyn MarketDataSource>,
    mounted: bool,
}

impl Screen {
    pub fn new(config: AppConfig, source: Arc<dyn MarketDataSource>) -> Self {
        let state = ScreenState::new(config.variant, config.log.capacity);
        Self {
            id: Uuid::new_v4(),
            config,
            state: Arc::new(Mutex::new(state)),
            tasks: TaskSet::new(),
            source,
            mounted: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Shared state, for rendering
    pub fn state(&self) -> SharedScreenState {
        Arc::clone(&self.state)
    }

    /// Read the current state
    pub fn read<R>(&self, f: impl FnOnce(&ScreenState) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    pub fn handle(&self) -> ScreenHandle {
        ScreenHandle::new(self.state(), self.tasks.token())
    }

    pub fn is_torn_down(&self) -> bool {
        self.tasks.is_cancelled()
    }

    /// Number of timers and fetches still outstanding
    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    /// Start the boot sequence and the initial fetch
    ///
    /// Fires once per screen; later calls return false and do nothing.
    pub fn mount(&mut self) -> bool {
        if self.mounted || self.is_torn_down() {
            return false;
        }
        self.mounted = true;

        let mode = BootMode::for_variant(self.config.variant, &self.config.timing);
        info!(
            event_type = "SCREEN_MOUNT",
            screen_id = %self.id,
            variant = %self.config.variant,
            boot_mode = ?mode,
            "Screen mounted"
        );

        let handle = self.handle();
        self.tasks.spawn("boot", BootSequencer::new(mode).run(handle));
        self.refresh();
        true
    }

    /// Fetch a fresh market snapshot
    ///
    /// Repeated calls each issue their own request; the last to complete wins.
    pub fn refresh(&mut self) -> bool {
        let handle = self.handle();
        if handle.update(ScreenState::begin_sync).is_none() {
            return false;
        }

        let source = Arc::clone(&self.source);
        let address = self.config.token.contract_address.clone();
        self.tasks.spawn("market_fetch", async move {
            let outcome = source.fetch(&address).await;
            handle.update(|state| state.apply_fetch(outcome));
        })
    }

    /// Synthesize a narrative from the current trend input after the delay
    ///
    /// Empty input (or a strike already running) is silently ignored.
    pub fn strike(&mut self) -> bool {
        let handle = self.handle();
        let Some(trend) = handle.update(ScreenState::begin_strike).flatten() else {
            debug!(event_type = "STRIKE_IGNORED", screen_id = %self.id, "Strike request ignored");
            return false;
        };

        let token = self.config.token.clone();
        let delay = self.config.timing.strike_delay();
        self.tasks.spawn("strike", async move {
            tokio::time::sleep(delay).await;
            let narrative = synthesize(&trend, &token);
            handle.update(|state| state.finish_strike(narrative));
        })
    }

    /// Begin the enclave unlock animation (sentinel variant)
    pub fn unlock(&mut self) -> bool {
        let handle = self.handle();
        if !handle.update(ScreenState::begin_unlock).unwrap_or(false) {
            return false;
        }
        let delay = self.config.timing.unlock_delay();
        self.tasks.spawn("enclave_unlock", run_unlock(delay, handle))
    }

    /// Make `module` the active panel
    pub fn select(&self, module: ModuleId) -> bool {
        self.handle()
            .update(|state| state.view.select(module))
            .is_some()
    }

    /// Replace the trend input
    pub fn set_trend(&self, trend: &str) -> bool {
        self.handle()
            .update(|state| {
                state.trend_input.clear();
                for c in trend.chars() {
                    state.push_trend_char(c);
                }
            })
            .is_some()
    }

    pub fn push_trend_char(&self, c: char) {
        self.handle().update(|state| state.push_trend_char(c));
    }

    pub fn pop_trend_char(&self) {
        self.handle().update(ScreenState::pop_trend_char);
    }

    /// Cancel every pending timer and fetch; idempotent
    pub fn teardown(&mut self) {
        if self.tasks.is_cancelled() {
            return;
        }
        let pending = self.tasks.pending_names();
        {
            let _state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            self.tasks.cancel_all();
        }
        info!(
            event_type = "SCREEN_TEARDOWN",
            screen_id = %self.id,
            cancelled = ?pending,
            "Screen torn down"
        );
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("id", &self.id)
            .field("variant", &self.config.variant)
            .field("mounted", &self.mounted)
            .field("torn_down", &self.is_torn_down())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::FetchError;
    use crate::core::test_utils::{sample_snapshot as snapshot, test_screen as screen_with, ScriptedSource};
    use std::time::Duration;

    #[test]
    fn test_initial_state() {
        let state = ScreenState::new(Variant::Terminal, 16);
        assert!(!state.boot.booted);
        assert_eq!(state.active_module(), ModuleId::Pulse);
        assert_eq!(state.logs.len(), 3);
        assert!(state.snapshot.is_none());
        assert!(state.narrative.is_none());
    }

    #[test]
    fn test_empty_strike_is_noop() {
        let mut state = ScreenState::new(Variant::Terminal, 16);
        let logs_before = state.logs.len();

        assert_eq!(state.begin_strike(), None);
        assert!(!state.is_striking);
        assert_eq!(state.logs.len(), logs_before);
    }

    #[test]
    fn test_whitespace_trend_is_noop_and_trend_is_trimmed() {
        let mut state = ScreenState::new(Variant::Terminal, 16);
        state.trend_input = " \t ".to_string();
        let logs_before = state.logs.len();
        assert_eq!(state.begin_strike(), None);
        assert!(!state.is_striking);
        assert_eq!(state.logs.len(), logs_before);

        state.trend_input = "  ELON_X ".to_string();
        assert_eq!(state.begin_strike().as_deref(), Some("ELON_X"));
        assert_eq!(
            state.logs.count_containing("STRIKE: Synthesizing narrative for \"ELON_X\"..."),
            1
        );
    }

    #[test]
    fn test_strike_while_striking_is_ignored() {
        let mut state = ScreenState::new(Variant::Terminal, 16);
        state.trend_input = "BASE_SURGE".to_string();
        assert_eq!(state.begin_strike().as_deref(), Some("BASE_SURGE"));
        let logs_after_first = state.logs.len();
        assert_eq!(state.begin_strike(), None);
        assert_eq!(state.logs.len(), logs_after_first);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_snapshot() {
        let mut state = ScreenState::new(Variant::Terminal, 16);
        state.begin_sync();
        state.apply_fetch(Ok(snapshot("1.23")));

        state.begin_sync();
        state.apply_fetch(Err(FetchError::NoPairs));

        assert_eq!(state.snapshot, Some(snapshot("1.23")));
        assert_eq!(state.logs.count_containing(MSG_SYNC_FAILED), 1);
        assert!(!state.is_syncing());
    }

    #[test]
    fn test_unlock_only_in_sentinel() {
        let mut terminal = ScreenState::new(Variant::Terminal, 16);
        assert!(!terminal.begin_unlock());
        assert!(terminal.enclave_verified());

        let mut sentinel = ScreenState::new(Variant::Sentinel, 16);
        assert!(!sentinel.enclave_verified());
        assert!(sentinel.begin_unlock());
        assert!(!sentinel.begin_unlock());
        sentinel.finish_unlock();
        assert_eq!(sentinel.enclave, EnclaveState::Unlocked);
        assert!(sentinel.enclave_verified());
    }

    #[test]
    fn test_trend_input_editing() {
        let mut state = ScreenState::new(Variant::Terminal, 16);
        for c in "abc\n".chars() {
            state.push_trend_char(c);
        }
        assert_eq!(state.trend_input, "abc");
        state.pop_trend_char();
        assert_eq!(state.trend_input, "ab");

        for _ in 0..100 {
            state.push_trend_char('x');
        }
        assert_eq!(state.trend_input.chars().count(), MAX_TREND_LEN);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_boot_after_delay() {
        let mut screen = screen_with(Variant::Terminal, ScriptedSource::failing());
        assert!(screen.mount());
        assert!(!screen.mount());

        tokio::time::sleep(Duration::from_millis(1990)).await;
        assert!(!screen.read(|s| s.boot.booted));

        tokio::time::sleep(Duration::from_millis(20)).await;
        screen.read(|s| {
            assert!(s.boot.booted);
            assert_eq!(s.boot.progress, 100);
            assert_eq!(s.logs.count_containing(MSG_BOOT_READY), 1);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_sentinel_progress_counter() {
        let mut screen = screen_with(Variant::Sentinel, ScriptedSource::failing());
        screen.mount();

        tokio::time::sleep(Duration::from_millis(1025)).await;
        screen.read(|s| {
            assert_eq!(s.boot.progress, 40);
            assert!(!s.boot.booted);
        });

        tokio::time::sleep(Duration::from_millis(1500)).await;
        screen.read(|s| {
            assert_eq!(s.boot.progress, 100);
            assert!(s.boot.booted);
            assert_eq!(s.logs.count_containing(MSG_BOOT_READY), 1);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_fetch_populates_snapshot() {
        let source = ScriptedSource::new(vec![Ok(snapshot("1.23"))]);
        let mut screen = screen_with(Variant::Terminal, source);
        screen.mount();

        tokio::time::sleep(Duration::from_millis(10)).await;
        screen.read(|s| {
            assert_eq!(s.snapshot, Some(snapshot("1.23")));
            assert_eq!(s.logs.count_containing(MSG_SYNC_START), 1);
            assert_eq!(s.logs.count_containing(MSG_SYNC_OK), 1);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_strike_completes_after_delay() {
        let mut screen = screen_with(Variant::Terminal, ScriptedSource::failing());
        screen.set_trend("BASE_SURGE");
        assert!(screen.strike());
        assert!(screen.read(|s| s.is_striking));

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert!(screen.read(|s| s.narrative.is_none()));

        tokio::time::sleep(Duration::from_millis(200)).await;
        screen.read(|s| {
            assert!(!s.is_striking);
            let text = s.narrative.as_deref().unwrap();
            assert!(text.contains("BASE_SURGE"));
            assert_eq!(s.logs.count_containing(MSG_STRIKE_DONE), 1);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_timers() {
        let mut screen = screen_with(Variant::Sentinel, ScriptedSource::failing());
        screen.mount();
        screen.set_trend("BASE_SURGE");
        screen.strike();
        screen.unlock();
        tokio::time::sleep(Duration::from_millis(100)).await;

        screen.teardown();
        let before = screen.read(|s| s.clone());

        tokio::time::sleep(Duration::from_secs(10)).await;
        screen.read(|s| {
            assert_eq!(s.boot, before.boot);
            assert!(!s.boot.booted);
            assert_eq!(s.logs.len(), before.logs.len());
            assert!(s.narrative.is_none());
            assert_eq!(s.enclave, EnclaveState::Unlocking);
        });

        // User actions after teardown are ignored
        assert!(!screen.select(ModuleId::Tee));
        assert!(!screen.refresh());
        assert_eq!(screen.read(|s| s.active_module()), ModuleId::Pulse);

        // Second teardown is harmless
        screen.teardown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_independent_screens() {
        let mut a = screen_with(Variant::Terminal, ScriptedSource::failing());
        let b = screen_with(Variant::Terminal, ScriptedSource::failing());
        a.select(ModuleId::Logs);
        a.teardown();

        assert_ne!(a.id(), b.id());
        assert!(b.select(ModuleId::Strike));
        assert_eq!(b.read(|s| s.active_module()), ModuleId::Strike);
        assert_eq!(a.read(|s| s.active_module()), ModuleId::Logs);
    }
}
