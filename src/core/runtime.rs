//! Headless runtime
//!
//! Drives a screen without a terminal (`LOG_FORMAT=json|pretty`): mount, wait
//! for boot and the initial sync to settle, return the audit trail. A shutdown
//! broadcast ends the wait early.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{info, warn};

use super::boot::BootMode;
use super::log_buffer::LogEntry;
use super::screen::Screen;

/// How often the settle condition is checked
const SETTLE_POLL: Duration = Duration::from_millis(50);

/// Slack on top of boot time plus HTTP timeout
const SETTLE_GRACE: Duration = Duration::from_secs(1);

/// Upper bound on how long a mounted screen needs to settle
pub fn settle_deadline(screen: &Screen) -> Duration {
    let config = screen.config();
    BootMode::for_variant(config.variant, &config.timing).expected_duration()
        + config.api.timeout()
        + SETTLE_GRACE
}

/// Mount `screen`, wait until it is booted with no sync in flight, then tear
/// it down and return the audit trail as display lines.
pub async fn run_headless(
    mut screen: Screen,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Vec<String> {
    screen.mount();
    let deadline = Instant::now() + settle_deadline(&screen);

    let mut ticker = interval(SETTLE_POLL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // Shutdown takes priority
            _ = shutdown_rx.recv() => {
                info!(event_type = "HEADLESS_SHUTDOWN", "Shutdown requested before screen settled");
                break;
            }
            _ = ticker.tick() => {
                if screen.read(|s| s.boot.booted && !s.is_syncing()) {
                    break;
                }
                if Instant::now() >= deadline {
                    warn!(
                        event_type = "HEADLESS_TIMEOUT",
                        pending = ?screen.pending_tasks(),
                        "Screen did not settle before deadline"
                    );
                    break;
                }
            }
        }
    }

    let lines = screen.read(|s| s.logs.iter().map(LogEntry::display).collect());
    screen.teardown();
    lines
}
