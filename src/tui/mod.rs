//! TUI Module for the dashboard
//!
//! Full-screen terminal front-end, the default mode (`LOG_FORMAT=tui`).
//!
//! # Usage
//! ```bash
//! cargo run --release
//! SENTINEL_VARIANT=sentinel cargo run --release
//! ```
//!
//! # Keyboard Controls
//! - `Tab` / `Shift+Tab`: Cycle modules, `F1`-`F4`: Select module
//! - `1`-`4`: Select module (outside STRIKE)
//! - `r`: Refresh market data, `u`: Unlock enclave (sentinel)
//! - STRIKE: type a trend, `Backspace` deletes, `Enter` strikes
//! - `↑/k` `↓/j`: Scroll logs
//! - `q` (outside STRIKE), `Esc` or `Ctrl+C`: Quit

pub mod app;
pub mod event;
pub mod ui;

use std::io::{stdout, Stdout};

use crossterm::{
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use crate::error::{AppError, Result};

pub use app::App;
pub use event::{handle_events_async, process_key_event, EventResult};

/// Raw-mode alternate screen, restored on drop
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode().map_err(|e| AppError::Terminal(format!("raw mode unavailable: {}", e)))?;

        let mut out = stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::Terminal(format!("alternate screen unavailable: {}", e)));
        }

        match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                Err(AppError::Terminal(e.to_string()))
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the dashboard until the user quits
///
/// Mounts the screen, redraws on every poll cycle and tears the screen down
/// before the terminal is restored.
pub async fn run(mut app: App) -> Result<()> {
    let mut session = TerminalSession::new()?;
    let mut events = EventStream::new();

    app.screen.mount();
    info!(event_type = "TUI_STARTED", screen_id = %app.screen.id(), "Dashboard running");

    let outcome = loop {
        app.tick();
        if let Err(e) = session.terminal.draw(|frame| ui::draw(frame, &app)) {
            break Err(AppError::Io(e));
        }

        if handle_events_async(&mut app, &mut events).await == EventResult::Quit || app.should_quit {
            break Ok(());
        }
    };

    app.screen.teardown();
    info!(
        event_type = "TUI_STOPPED",
        uptime = %app.uptime_str(),
        "Dashboard closed"
    );
    outcome
}
