//! Thumbnail grid.
//!
//! Each cell is drawn as a full set of lines (border, preview, caption) and
//! clipped to the grid area with `Paragraph::scroll`, so rows cut off at the
//! top or bottom edge show the part that is on screen.

use image::RgbImage;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::App;
use crate::events::Action;
use crate::search::Hit;
use crate::thumbnail::ThumbnailState;
use crate::tui::interaction::InteractiveRegion;
use crate::tui::theme::*;
use crate::visibility::LayoutProbe;

use super::{rating_stars, truncate};

pub fn render_grid(frame: &mut Frame, area: Rect, app: &mut App) {
    app.set_grid_area(area.width, area.height);

    let item_height = app.layout.item_height();
    app.interactions.register(InteractiveRegion::scrollable(
        "grid",
        area.into(),
        Action::ScrollUp(item_height as u32),
        Action::ScrollDown(item_height as u32),
    ));

    if app.session.is_empty() {
        render_empty(frame, area, app);
        return;
    }

    let columns = app.layout.column_count();
    let item_width = app.layout.item_width();
    let scroll_top = app.layout.scroll_top() as i64;
    let selected = app.navigator.selected_index(&app.session);

    for row in app.layout.visible_rows() {
        let top = row as i64 * item_height as i64 - scroll_top;
        let bottom = (top + item_height as i64).min(area.height as i64);
        let visible_top = top.max(0);
        if bottom <= visible_top {
            continue;
        }
        let skip = (visible_top - top) as u16;

        for col in 0..columns {
            let index = row * columns + col;
            let Some(hit) = app.session.hit(index) else {
                break;
            };
            let cell = Rect::new(
                area.x + col as u16 * item_width,
                area.y + visible_top as u16,
                item_width,
                (bottom - visible_top) as u16,
            );

            let state = if app.tracker.is_ever_visible(index) {
                app.thumbnails.state_mut(&hit.id)
            } else {
                None
            };
            let lines = cell_lines(hit, state, item_width, item_height, selected == Some(index));
            frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), cell);
            app.interactions.register_grid_item(index, cell.into());
        }
    }
}

fn render_empty(frame: &mut Frame, area: Rect, app: &App) {
    let message = if app.session.is_searching() {
        "Searching…"
    } else if app.session.last_error().is_some() {
        "Search failed"
    } else {
        "No images match"
    };
    let mut lines = vec![Line::default(); (area.height / 2) as usize];
    lines.push(Line::styled(message, Style::new().fg(TEXT_DIM)).centered());
    frame.render_widget(Paragraph::new(lines), area);
}

/// Every line of a cell, top border to bottom border.
fn cell_lines(
    hit: &Hit,
    state: Option<&mut ThumbnailState>,
    width: u16,
    height: u16,
    selected: bool,
) -> Vec<Line<'static>> {
    if width < 3 || height < 3 {
        let style = if selected {
            Style::new().bg(LOGO_GOLD)
        } else {
            Style::new()
        };
        return (0..height)
            .map(|_| Line::styled(" ".repeat(width as usize), style))
            .collect();
    }

    let border = if selected {
        Style::new().fg(LOGO_GOLD)
    } else {
        Style::new().fg(CELL_BORDER)
    };
    let inner_width = (width - 2) as usize;
    // One inner row is the caption
    let preview_rows = (height - 3) as usize;

    let mut lines = Vec::with_capacity(height as usize);
    lines.push(Line::styled(
        format!("┌{}┐", "─".repeat(inner_width)),
        border,
    ));

    for body in preview(state, inner_width, preview_rows) {
        lines.push(framed(body, inner_width, border));
    }
    lines.push(framed(caption(hit, inner_width), inner_width, border));

    lines.push(Line::styled(
        format!("└{}┘", "─".repeat(inner_width)),
        border,
    ));
    lines
}

/// Wrap content in side borders, padding it to `inner_width`.
fn framed(mut content: Vec<Span<'static>>, inner_width: usize, border: Style) -> Line<'static> {
    let used: usize = content.iter().map(|s| s.width()).sum();
    if used < inner_width {
        content.push(Span::raw(" ".repeat(inner_width - used)));
    }
    let mut spans = Vec::with_capacity(content.len() + 2);
    spans.push(Span::styled("│", border));
    spans.extend(content);
    spans.push(Span::styled("│", border));
    Line::from(spans)
}

fn preview(
    state: Option<&mut ThumbnailState>,
    width: usize,
    rows: usize,
) -> Vec<Vec<Span<'static>>> {
    let mut body = vec![vec![]; rows];
    if rows == 0 || width == 0 {
        return body;
    }

    let marker = match state {
        None => return body,
        Some(ThumbnailState::Ready(thumbnail)) => {
            // Two pixel rows per terminal row
            let image = thumbnail.preview(width as u32, rows as u32 * 2);
            let pixel_rows = half_blocks(image);
            let top = (rows - pixel_rows.len().min(rows)) / 2;
            let left = (width - (image.width() as usize).min(width)) / 2;
            for (i, spans) in pixel_rows.into_iter().take(rows).enumerate() {
                let mut line = vec![Span::raw(" ".repeat(left))];
                line.extend(spans);
                body[top + i] = line;
            }
            return body;
        }
        Some(ThumbnailState::Requested) => Span::styled("…", Style::new().fg(TEXT_DIM)),
        Some(ThumbnailState::Failed(_)) => Span::styled("✗", Style::new().fg(LOGO_CORAL)),
    };

    body[rows / 2] = vec![Span::raw(" ".repeat((width - 1) / 2)), marker];
    body
}

/// One line of `▀` spans per pair of pixel rows: upper pixel in the
/// foreground, lower pixel in the background.
fn half_blocks(image: &RgbImage) -> Vec<Vec<Span<'static>>> {
    let (width, height) = image.dimensions();
    (0..height.div_ceil(2))
        .map(|pair| {
            (0..width)
                .map(|x| {
                    let upper = rgb(image.get_pixel(x, pair * 2));
                    let mut style = Style::new().fg(upper);
                    if pair * 2 + 1 < height {
                        style = style.bg(rgb(image.get_pixel(x, pair * 2 + 1)));
                    }
                    Span::styled("▀", style)
                })
                .collect()
        })
        .collect()
}

fn rgb(pixel: &image::Rgb<u8>) -> Color {
    let [r, g, b] = pixel.0;
    Color::Rgb(r, g, b)
}

/// Tags on the left, rating stars on the right.
fn caption(hit: &Hit, width: usize) -> Vec<Span<'static>> {
    let stars = hit.rating().map(rating_stars).unwrap_or_default();
    let stars_width = stars.chars().count();
    let tags = hit.tags().join(", ");
    let label = if tags.is_empty() { hit.id.clone() } else { tags };

    if stars_width + 1 >= width {
        return vec![Span::styled(truncate(&label, width), Style::new().fg(TEXT_DIM))];
    }

    let label = truncate(&label, width - stars_width - 1);
    let gap = width - label.chars().count() - stars_width;
    vec![
        Span::styled(label, Style::new().fg(TEXT_DIM)),
        Span::raw(" ".repeat(gap)),
        Span::styled(stars, Style::new().fg(LOGO_GOLD)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use serde_json::json;

    use crate::search::SearchResponse;
    use crate::thumbnail::Thumbnail;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_cell_has_fixed_size() {
        let hit = Hit::new("img01");
        let lines = cell_lines(&hit, None, 12, 6, false);
        assert_eq!(lines.len(), 6);
        for line in &lines {
            assert_eq!(line.width(), 12);
        }
        assert_eq!(line_text(&lines[0]), "┌──────────┐");
        assert_eq!(line_text(&lines[5]), "└──────────┘");
    }

    #[test]
    fn test_caption_shows_tags_and_rating() {
        let hit = Hit::new("img01")
            .with_field("XMP:Subject", json!("beach, sunset"))
            .with_field("XMP:Rating", json!(3));
        let caption = caption(&hit, 20);
        let text: String = caption.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "beach, sunset    ★★★");

        // Falls back to the id when there are no tags
        let text = caption_text(&Hit::new("img02"), 10);
        assert_eq!(text, "img02     ");
    }

    fn caption_text(hit: &Hit, width: usize) -> String {
        caption(hit, width).iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_preview_markers() {
        let mut requested = ThumbnailState::Requested;
        let body = preview(Some(&mut requested), 9, 3);
        assert!(body[0].is_empty());
        let middle: String = body[1].iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(middle, "    …");

        // Never-visible cells stay blank
        let body = preview(None, 9, 3);
        assert!(body.iter().all(|line| line.is_empty()));
    }

    #[test]
    fn test_ready_preview_uses_half_blocks() {
        let image = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        let mut ready = ThumbnailState::Ready(Thumbnail::new(image));
        let body = preview(Some(&mut ready), 4, 2);

        // 8x8 fitted into 4x4 pixels: two terminal rows of four blocks
        assert_eq!(body.len(), 2);
        for line in &body {
            let blocks = line.iter().filter(|s| s.content == "▀").count();
            assert_eq!(blocks, 4);
        }
    }

    #[test]
    fn test_half_blocks_odd_height() {
        let image = RgbImage::from_pixel(2, 3, Rgb([255, 0, 0]));
        let rows = half_blocks(&image);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0].style.bg, Some(Color::Rgb(255, 0, 0)));
        // Last row has no lower pixel
        assert_eq!(rows[1][0].style.bg, None);
    }

    #[test]
    fn test_selected_cell_border() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"hits":[{"id":"a.jpg","fields":null}],"total_hits":1}"#)
                .unwrap();
        let lines = cell_lines(&response.hits[0], None, 10, 4, true);
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].style.fg, Some(LOGO_GOLD));
        assert_eq!(lines[3].style.fg, Some(LOGO_GOLD));
    }
}
