pub mod dialog;
mod editor;
pub mod file_tree;
mod layout;
mod status_bar;
mod tab_bar;

use crate::app::App;
use ratatui::prelude::*;

pub use layout::Pane;

/// Draw the entire UI
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Check minimum size
    if area.width < 60 || area.height < 12 {
        draw_size_warning(frame, area);
        return;
    }

    // Main layout: content, status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Content area
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    layout::draw_content(frame, app, main_chunks[0]);
    status_bar::draw(frame, app, main_chunks[1]);

    // Prompt goes last so it sits on top
    if app.prompt.is_some() {
        dialog::draw_prompt(frame, app);
    }
}

/// Draw a warning when terminal is too small
fn draw_size_warning(frame: &mut Frame, area: Rect) {
    use ratatui::widgets::{Block, Borders, Paragraph};

    let warning = Paragraph::new("Terminal too small!\nMinimum: 60x12")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("resedit"));

    frame.render_widget(warning, area);
}
