//! Async keyboard event handling for TUI
//!
//! Uses crossterm's EventStream for non-blocking, async-compatible input.
//! Key handling itself lives in [`process_key_event`], which only touches
//! the `App` and can be tested without a terminal.

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::core::ModuleId;

use super::app::App;

/// Poll window per loop iteration; also the redraw cadence when idle
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Result of processing a single event poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue the TUI loop
    Continue,
    /// User requested quit
    Quit,
}

/// Poll for keyboard events asynchronously with a timeout.
///
/// Returns `EventResult::Quit` when the user quits or the input stream ends.
/// I/O errors are logged as warnings rather than silently swallowed.
pub async fn handle_events_async(app: &mut App, event_stream: &mut EventStream) -> EventResult {
    let maybe_event = tokio::time::timeout(POLL_TIMEOUT, event_stream.next()).await;

    match maybe_event {
        // No input this cycle
        Err(_) => EventResult::Continue,
        // Stream ended (terminal closed)
        Ok(None) => {
            app.quit();
            EventResult::Quit
        }
        Ok(Some(Err(e))) => {
            warn!(event_type = "TERMINAL_IO_ERROR", error = %e, "Terminal I/O error during event polling");
            EventResult::Continue
        }
        Ok(Some(Ok(Event::Key(key)))) if key.kind != KeyEventKind::Release => {
            process_key_event(key, app)
        }
        Ok(Some(Ok(_))) => EventResult::Continue,
    }
}

/// Apply one key press to the app
///
/// `Esc` and `Ctrl+C` always quit. Until boot completes every other key
/// except `q` is ignored. In the STRIKE module printable characters edit the
/// trend input, so `q`, `r`, `u` and digits lose their shortcut meaning there.
pub fn process_key_event(key: KeyEvent, app: &mut App) -> EventResult {
    if key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        app.quit();
        return EventResult::Quit;
    }

    let (booted, active) = app.screen.read(|s| (s.boot.booted, s.active_module()));
    let in_strike = booted && active == ModuleId::Strike;

    if !in_strike && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
        app.quit();
        return EventResult::Quit;
    }
    if !booted {
        return EventResult::Continue;
    }

    match key.code {
        KeyCode::Tab => app.select(active.next()),
        KeyCode::BackTab => app.select(active.prev()),
        KeyCode::F(n) => {
            if let Some(module) = ModuleId::from_slot(usize::from(n)) {
                app.select(module);
            }
        }

        KeyCode::Enter if in_strike => {
            app.screen.strike();
        }
        KeyCode::Backspace if in_strike => app.screen.pop_trend_char(),
        KeyCode::Char(c) if in_strike => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                app.screen.push_trend_char(c);
            }
        }

        KeyCode::Char(c @ '1'..='4') => {
            if let Some(module) = c.to_digit(10).and_then(|d| ModuleId::from_slot(d as usize)) {
                app.select(module);
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.screen.refresh();
        }
        KeyCode::Char('u') | KeyCode::Char('U') => {
            if !app.screen.unlock() {
                debug!(event_type = "UNLOCK_IGNORED", "Unlock not available in current state");
            }
        }

        // Scroll the audit trail: j/k or arrows
        KeyCode::Char('k') | KeyCode::Up => app.scroll_logs_up(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_logs_down(),

        _ => {}
    }

    EventResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;
    use crate::core::screen::{MSG_SYNC_START, MSG_UNLOCK_START};
    use crate::core::test_utils::{test_screen, ScriptedSource};
    use crate::core::EnclaveState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn booted_app(variant: Variant) -> App {
        let app = App::new(test_screen(variant, ScriptedSource::failing()));
        app.screen.handle().update(|s| s.finish_boot());
        app
    }

    fn active(app: &App) -> ModuleId {
        app.screen.read(|s| s.active_module())
    }

    #[test]
    fn test_escape_and_ctrl_c_always_quit() {
        let mut app = booted_app(Variant::Terminal);
        app.select(ModuleId::Strike);
        assert_eq!(process_key_event(press(KeyCode::Esc), &mut app), EventResult::Quit);
        assert!(app.should_quit);

        let mut app = booted_app(Variant::Terminal);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(process_key_event(ctrl_c, &mut app), EventResult::Quit);
    }

    #[test]
    fn test_q_types_into_strike_input() {
        let mut app = booted_app(Variant::Terminal);
        app.select(ModuleId::Strike);
        for c in "quq1".chars() {
            assert_eq!(process_key_event(press(KeyCode::Char(c)), &mut app), EventResult::Continue);
        }
        assert_eq!(app.screen.read(|s| s.trend_input.clone()), "quq1");
        assert_eq!(active(&app), ModuleId::Strike);

        process_key_event(press(KeyCode::Backspace), &mut app);
        assert_eq!(app.screen.read(|s| s.trend_input.clone()), "quq");
    }

    #[test]
    fn test_q_quits_outside_strike() {
        let mut app = booted_app(Variant::Terminal);
        assert_eq!(process_key_event(press(KeyCode::Char('q')), &mut app), EventResult::Quit);
    }

    #[test]
    fn test_module_navigation() {
        let mut app = booted_app(Variant::Terminal);
        process_key_event(press(KeyCode::Tab), &mut app);
        assert_eq!(active(&app), ModuleId::Strike);
        process_key_event(press(KeyCode::BackTab), &mut app);
        assert_eq!(active(&app), ModuleId::Pulse);
        process_key_event(press(KeyCode::BackTab), &mut app);
        assert_eq!(active(&app), ModuleId::Tee);
        process_key_event(press(KeyCode::F(3)), &mut app);
        assert_eq!(active(&app), ModuleId::Logs);
        process_key_event(press(KeyCode::Char('2')), &mut app);
        assert_eq!(active(&app), ModuleId::Strike);
        // Digits are input inside STRIKE; F-keys still navigate
        process_key_event(press(KeyCode::Char('1')), &mut app);
        assert_eq!(active(&app), ModuleId::Strike);
        process_key_event(press(KeyCode::F(1)), &mut app);
        assert_eq!(active(&app), ModuleId::Pulse);
    }

    #[test]
    fn test_keys_ignored_while_booting() {
        let mut app = App::new(test_screen(Variant::Terminal, ScriptedSource::failing()));
        process_key_event(press(KeyCode::Tab), &mut app);
        process_key_event(press(KeyCode::Char('r')), &mut app);
        assert_eq!(active(&app), ModuleId::Pulse);
        assert_eq!(app.screen.read(|s| s.logs.count_containing(MSG_SYNC_START)), 0);

        assert_eq!(process_key_event(press(KeyCode::Char('q')), &mut app), EventResult::Quit);
    }

    #[tokio::test]
    async fn test_refresh_and_unlock_keys() {
        let mut app = booted_app(Variant::Sentinel);
        process_key_event(press(KeyCode::Char('r')), &mut app);
        process_key_event(press(KeyCode::Char('u')), &mut app);

        app.screen.read(|s| {
            assert_eq!(s.logs.count_containing(MSG_SYNC_START), 1);
            assert_eq!(s.logs.count_containing(MSG_UNLOCK_START), 1);
            assert_eq!(s.enclave, EnclaveState::Unlocking);
        });
    }

    #[tokio::test]
    async fn test_enter_strikes_from_input() {
        let mut app = booted_app(Variant::Terminal);
        app.select(ModuleId::Strike);
        for c in "BASE".chars() {
            process_key_event(press(KeyCode::Char(c)), &mut app);
        }
        process_key_event(press(KeyCode::Enter), &mut app);
        assert!(app.screen.read(|s| s.is_striking));
    }
}
