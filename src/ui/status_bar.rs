use crate::app::App;
use crate::ui::Pane;
use ratatui::{prelude::*, widgets::Paragraph};
use unicode_width::UnicodeWidthStr;

/// Draw the status bar at the bottom of the screen
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let style = Style::default()
        .fg(app.theme.statusbar_fg)
        .bg(app.theme.statusbar_bg);

    let left_status = match app.sync.active() {
        Some(tab) => {
            let dirty = if tab.dirty { " [+]" } else { "" };
            match &tab.editor {
                Some(doc) => format!(
                    " {}{} | line: {}/{} | col: {} | {} | {}",
                    tab.path,
                    dirty,
                    doc.cursor.line + 1,
                    doc.line_count(),
                    doc.cursor.col + 1,
                    if doc.use_spaces { "SP" } else { "TAB" },
                    doc.mode.display_name(),
                ),
                None => format!(" {} | preview", tab.path),
            }
        }
        None => format!(" {}", app.sync.current_folder()),
    };

    let pane_name = match app.focused_pane {
        Pane::FileTree => "Files",
        Pane::Editor => "Editor",
    };
    let right_status = match &app.status_message {
        Some(message) => format!(" {} | {} ", message, pane_name),
        None => format!(" {} ", pane_name),
    };

    let padding = (area.width as usize).saturating_sub(left_status.width() + right_status.width());
    let full_text = format!("{}{}{}", left_status, " ".repeat(padding), right_status);

    frame.render_widget(Paragraph::new(full_text).style(style), area);
}
