//! Keyboard event handling.
//!
//! Typing always edits the query; arrows move the grid cursor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::navigator::CursorMove;

use super::Action;

/// Handle keyboard events and return the appropriate action.
pub fn handle_key_event(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('u') if ctrl => Action::ClearQuery,

        KeyCode::Left => Action::MoveCursor(CursorMove::Left),
        KeyCode::Right => Action::MoveCursor(CursorMove::Right),
        KeyCode::Up => Action::MoveCursor(CursorMove::Up),
        KeyCode::Down => Action::MoveCursor(CursorMove::Down),

        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home => Action::ScrollToTop,
        KeyCode::End => Action::ScrollToBottom,

        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) if !ctrl => Action::InputChar(c),

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_arrows_move_cursor() {
        assert_eq!(handle_key_event(key(KeyCode::Left)), Action::MoveCursor(CursorMove::Left));
        assert_eq!(handle_key_event(key(KeyCode::Down)), Action::MoveCursor(CursorMove::Down));
    }

    #[test]
    fn test_typing_edits_query() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'))), Action::InputChar('q'));
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Action::InputChar('Q')
        );
        assert_eq!(handle_key_event(key(KeyCode::Backspace)), Action::InputBackspace);
        assert_eq!(handle_key_event(ctrl('u')), Action::ClearQuery);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Esc)), Action::Quit);
        assert_eq!(handle_key_event(ctrl('c')), Action::Quit);
        assert_eq!(handle_key_event(ctrl('x')), Action::None);
    }
}
