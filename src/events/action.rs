//! Action enum for decoupling input handling from state changes.
//!
//! Actions represent user intents that can be logged, replayed, or customized.

#![allow(dead_code)]

use crate::navigator::CursorMove;

/// Actions that can be dispatched from event handlers.
///
/// These represent user intents and are processed by the App to update state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // === Application ===
    /// Quit the application
    Quit,

    // === Query input ===
    /// Append a character to the query
    InputChar(char),
    /// Delete the last query character
    InputBackspace,
    /// Clear the query
    ClearQuery,

    // === Grid navigation ===
    /// Move the selection cursor
    MoveCursor(CursorMove),
    /// Select the hit at a grid index
    SelectIndex(usize),

    // === Scrolling ===
    /// Scroll up by n lines
    ScrollUp(u32),
    /// Scroll down by n lines
    ScrollDown(u32),
    /// Scroll up one viewport
    PageUp,
    /// Scroll down one viewport
    PageDown,
    /// Scroll to top
    ScrollToTop,
    /// Scroll to bottom
    ScrollToBottom,

    /// No action
    None,
}
