use crate::app::App;
use ratatui::prelude::*;

use super::{editor, file_tree, tab_bar};

/// Represents which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    FileTree,
    Editor,
}

/// Width of the tree pane for a content area of `width` columns
pub fn sidebar_width(width: u16, percent: u16) -> u16 {
    let sidebar = (width as u32 * percent as u32 / 100) as u16;
    sidebar.clamp(15.min(width), width.saturating_sub(30).max(15.min(width)))
}

/// Draw the main content area: tree | (tab bar, editor)
pub fn draw_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(sidebar_width(area.width, app.sidebar_width_percent)),
            Constraint::Min(20),
        ])
        .split(area);

    let focused = app.focused_pane == Pane::FileTree;
    file_tree::draw(frame, app, h_chunks[0], focused);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(3),    // Editor
        ])
        .split(h_chunks[1]);

    tab_bar::draw(frame, app, v_chunks[0]);
    let focused = app.focused_pane == Pane::Editor;
    editor::draw(frame, app, v_chunks[1], focused);
}
