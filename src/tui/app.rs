//! TUI Application State
//!
//! Wraps the dashboard `Screen` with the bits of state that only matter to
//! the terminal front-end: quit flag, log scroll offset, uptime and frame
//! counter for blinking elements.

use std::time::{Duration, Instant};

use crate::core::{ModuleId, Screen};

/// Frames per cursor blink phase
const BLINK_FRAMES: u64 = 10;

/// Terminal front-end state around one screen
#[derive(Debug)]
pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    /// Lines scrolled back from the newest entry in the LOGS module
    pub log_scroll_offset: usize,
    pub uptime_start: Instant,
    pub frame_count: u64,
}

impl App {
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            should_quit: false,
            log_scroll_offset: 0,
            uptime_start: Instant::now(),
            frame_count: 0,
        }
    }

    /// Formatted uptime, `HHH:MM:SS`
    pub fn uptime_str(&self) -> String {
        format_uptime(self.uptime_start.elapsed())
    }

    /// Fraction of the loading bar to fill, 0.0..=1.0
    ///
    /// The progress-counter boot reports its own value; the fixed-delay boot is
    /// animated from elapsed time.
    pub fn boot_ratio(&self, progress: u8) -> f64 {
        let timing = &self.screen.config().timing;
        match self.screen.config().variant {
            crate::config::Variant::Sentinel => f64::from(progress.min(100)) / 100.0,
            crate::config::Variant::Terminal => {
                let total = timing.boot_delay().as_secs_f64();
                if total <= 0.0 {
                    return 1.0;
                }
                (self.uptime_start.elapsed().as_secs_f64() / total).min(1.0)
            }
        }
    }

    pub fn tick(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
    }

    pub fn cursor_visible(&self) -> bool {
        (self.frame_count / BLINK_FRAMES) % 2 == 0
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Switch module; leaving LOGS resets its scroll position
    pub fn select(&mut self, module: ModuleId) {
        if self.screen.select(module) {
            self.log_scroll_offset = 0;
        }
    }

    pub fn scroll_logs_up(&mut self) {
        let max_offset = self
            .screen
            .read(|s| s.logs.len())
            .saturating_sub(1);
        if self.log_scroll_offset < max_offset {
            self.log_scroll_offset += 1;
        }
    }

    pub fn scroll_logs_down(&mut self) {
        self.log_scroll_offset = self.log_scroll_offset.saturating_sub(1);
    }
}

/// `HHH:MM:SS` with hours unbounded (e.g. `142:32:04`)
pub fn format_uptime(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
