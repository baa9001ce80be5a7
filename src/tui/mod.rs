//! Terminal rendering: layout of the screen and its components.

pub mod components;
pub mod interaction;
pub mod theme;
pub mod ui;
