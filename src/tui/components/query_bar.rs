//! Query bar - the search input line.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::tui::theme::*;

const PROMPT: &str = "> ";

/// Render the query input and place the terminal cursor at its end.
pub fn render_query_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(PROMPT, Style::new().fg(LOGO_MINT))];

    if app.query.is_empty() {
        spans.push(Span::styled("all images", Style::new().fg(TEXT_DIM)));
    } else {
        spans.push(Span::styled(app.query.clone(), Style::new().fg(TEXT_WHITE)));
    }

    if app.session.is_searching() {
        spans.push(Span::styled("  searching…", Style::new().fg(LOGO_LIGHT_BLUE)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let cursor_x = PROMPT.len() + app.query.chars().count();
    let cursor_x = (area.x as usize + cursor_x).min((area.x + area.width.saturating_sub(1)) as usize);
    frame.set_cursor_position(Position::new(cursor_x as u16, area.y));
}
