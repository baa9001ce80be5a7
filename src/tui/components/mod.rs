//! UI components for the TUI.
//!
//! # Component Organization
//!
//! - `query_bar` - Query input line
//! - `grid` - Thumbnail grid with half-block previews
//! - `status_bar` - Selected hit, counters and hotkeys

mod grid;
mod query_bar;
mod status_bar;

pub use grid::render_grid;
pub use query_bar::render_query_bar;
pub use status_bar::{render_hotkeys, render_status_bar};

/// Cut `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Stars for a rating, clamped to five.
pub fn rating_stars(rating: i64) -> String {
    "★".repeat(rating.clamp(0, 5) as usize)
}
