//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter) {
            app.state = AppState::Normal;
        }
        return false;
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return true;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return false;
    }

    // Table actions
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('l') => app.clear_table(),
            KeyCode::Char('e') => app.export_with_status(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::F(1) => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Down | KeyCode::Tab => app.focus_next(),
        KeyCode::Up | KeyCode::BackTab => app.focus_prev(),
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::PageUp => app.scroll_up(PAGE_SCROLL_SIZE),
        KeyCode::PageDown => app.scroll_down(PAGE_SCROLL_SIZE),
        KeyCode::Char(c) => app.push_char(c),
        _ => {}
    }

    false
}
