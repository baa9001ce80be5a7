//! Event handling module for keyboard and mouse events.
//!
//! Handlers translate terminal events into Actions; the App applies them.

mod action;
mod handler;
mod keyboard;
mod mouse;

pub use action::Action;
pub use handler::EventHandler;
