//! Status bar and hotkey line.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::thumbnail::ThumbnailState;
use crate::tui::theme::*;

use super::{rating_stars, truncate};

/// Selected hit (or the last error) on the left, counters on the right.
pub fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let counters = counters_line(app);
    let counters_width = counters.width() as u16;

    let chunks = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(counters_width.min(area.width)),
    ])
    .split(area);

    let left = if let Some(error) = app.session.last_error() {
        Line::styled(
            truncate(error, chunks[0].width as usize),
            Style::new().fg(LOGO_CORAL),
        )
    } else if let Some(hit) = app.selected_hit() {
        let mut spans = vec![Span::styled(hit.id.clone(), Style::new().fg(TEXT_WHITE))];
        if let Some(rating) = hit.rating() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(rating_stars(rating), Style::new().fg(LOGO_GOLD)));
        }
        if let Some(reason) = failure_note(app.thumbnails.state(&hit.id)) {
            spans.push(Span::styled(" • ✗ ", Style::new().fg(TEXT_DIM)));
            spans.push(Span::styled(reason.to_string(), Style::new().fg(LOGO_CORAL)));
        }
        let tags = hit.tags().join(", ");
        if !tags.is_empty() {
            let used: usize = spans.iter().map(|s| s.width()).sum();
            let room = (chunks[0].width as usize).saturating_sub(used + 3);
            spans.push(Span::styled(" • ", Style::new().fg(TEXT_DIM)));
            spans.push(Span::styled(truncate(&tags, room), Style::new().fg(TEXT_DIM)));
        }
        Line::from(spans)
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(left), chunks[0]);
    frame.render_widget(Paragraph::new(counters), chunks[1]);
}

/// Why the thumbnail of the selected hit couldn't be shown, if it failed.
fn failure_note(state: Option<&ThumbnailState>) -> Option<&str> {
    match state {
        Some(ThumbnailState::Failed(reason)) => Some(reason.as_str()),
        _ => None,
    }
}

fn counters_line(app: &App) -> Line<'static> {
    let dim = Style::new().fg(TEXT_DIM);
    let mut spans = vec![
        Span::styled(format!("{}", app.session.len()), Style::new().fg(TEXT_WHITE)),
        Span::styled(format!("/{} hits", app.session.total_hits()), dim),
    ];

    if let Some(band) = app.tracker.band() {
        spans.push(Span::styled(format!(" • {}–{}", band.min, band.max), dim));
    }

    spans.push(Span::styled(
        format!(
            " • seen {} • thumbs {}/{} ",
            app.tracker.ever_visible_count(),
            app.thumbnails.loaded_count(),
            app.thumbnails.loaded_count() + app.thumbnails.in_flight_count(),
        ),
        dim,
    ));
    Line::from(spans)
}

pub fn render_hotkeys(frame: &mut Frame, area: Rect) {
    let hotkeys = Line::from(vec![
        Span::styled("[type]", Style::new().fg(TEXT_WHITE)),
        Span::styled(" search • ", Style::new().fg(TEXT_DIM)),
        Span::styled("[C-u]", Style::new().fg(TEXT_WHITE)),
        Span::styled(" clear • ", Style::new().fg(TEXT_DIM)),
        Span::styled("[←↑↓→]", Style::new().fg(TEXT_WHITE)),
        Span::styled(" move • ", Style::new().fg(TEXT_DIM)),
        Span::styled("[PgUp/PgDn]", Style::new().fg(TEXT_WHITE)),
        Span::styled(" scroll • ", Style::new().fg(TEXT_DIM)),
        Span::styled("[Home/End]", Style::new().fg(TEXT_WHITE)),
        Span::styled(" top/bottom • ", Style::new().fg(TEXT_DIM)),
        Span::styled("[Esc]", Style::new().fg(TEXT_WHITE)),
        Span::styled(" quit", Style::new().fg(TEXT_DIM)),
    ]);
    frame.render_widget(Paragraph::new(hotkeys), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_note_only_for_failed() {
        let failed = ThumbnailState::Failed("Thumbnail server returned HTTP 404".to_string());
        assert_eq!(
            failure_note(Some(&failed)),
            Some("Thumbnail server returned HTTP 404")
        );
        assert_eq!(failure_note(Some(&ThumbnailState::Requested)), None);
        assert_eq!(failure_note(None), None);
    }
}
