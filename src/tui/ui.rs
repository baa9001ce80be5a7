use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::app::App;

use super::components::{render_grid, render_hotkeys, render_query_bar, render_status_bar};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Regions are rebuilt from scratch every frame
    app.interactions.clear();

    // Main vertical layout: query, grid, status, hotkeys
    let main_layout = Layout::vertical([
        Constraint::Length(1), // Query bar
        Constraint::Min(0),    // Grid
        Constraint::Length(1), // Status bar
        Constraint::Length(1), // Hotkeys
    ])
    .split(area);

    render_grid(frame, main_layout[1], app);
    render_status_bar(frame, main_layout[2], app);
    render_hotkeys(frame, main_layout[3]);
    // Last, so the cursor ends up in the query bar
    render_query_bar(frame, main_layout[0], app);
}
