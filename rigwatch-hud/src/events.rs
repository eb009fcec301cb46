//! Keyboard handling, mapped onto store mutations.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};

use crate::app::App;

/// Poll for a terminal event with a timeout.
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Any key closes the help overlay
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Rig inspection
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.select_rig_at(index);
        }
        KeyCode::Tab => app.cycle_selection(),
        KeyCode::Esc | KeyCode::Backspace => app.clear_selection(),

        // Alerts
        KeyCode::Char('x') => app.dismiss_front_alert(),
        KeyCode::Char('C') => app.clear_alerts(),

        // Flags
        KeyCode::Char('d') => app.toggle_debug(),
        KeyCode::Char('p') => app.toggle_pause(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}
