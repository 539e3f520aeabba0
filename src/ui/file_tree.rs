use crate::app::App;
use crate::file_tree::{VisibleEntry, ROOT_KEY};
use crate::theme::Theme;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Draw the resource tree pane
pub fn draw(frame: &mut Frame, app: &mut App, area: Rect, focused: bool) {
    let border_color = if focused {
        app.theme.border_focused
    } else {
        app.theme.border
    };

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(app.theme.sidebar_bg));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let header = Paragraph::new(format!(" {} ", app.root_name)).style(
        Style::default()
            .fg(app.theme.tree_dir)
            .bg(app.theme.sidebar_bg)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(header, Rect { height: 1, ..inner });

    if inner.height < 2 {
        app.file_tree_area = None;
        return;
    }
    let content_area = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };
    // Kept for mouse hit detection
    app.file_tree_area = Some(content_area);

    let visible_height = content_area.height as usize;
    let tree = &mut app.sync.tree;
    tree.ensure_visible_with_height(visible_height);

    let max_width = content_area.width.saturating_sub(1) as usize;
    let current_folder = app.sync.current_folder();
    let lines: Vec<Line> = (0..visible_height)
        .map(|row| {
            let index = app.sync.tree.scroll_offset + row;
            match app.sync.tree.entries.get(index) {
                Some(entry) => {
                    let selected = index == app.sync.tree.selected;
                    let current = entry.key == current_folder;
                    entry_line(entry, &app.theme, max_width, selected, selected && focused, current)
                }
                None => Line::from(Span::styled(
                    " ".repeat(max_width),
                    Style::default().bg(app.theme.sidebar_bg),
                )),
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), content_area);
}

fn entry_line(
    entry: &VisibleEntry,
    theme: &Theme,
    max_width: usize,
    selected: bool,
    bold: bool,
    current_folder: bool,
) -> Line<'static> {
    // The root is always shown expanded at depth 0, children start at depth 1
    let indent = "  ".repeat(entry.depth.saturating_sub(1));
    let icon = match (entry.is_folder, entry.expanded) {
        (true, true) => "▼ ",
        (true, false) => "▶ ",
        (false, _) => "  ",
    };
    let name = if entry.key == ROOT_KEY {
        "/".to_string()
    } else if entry.is_folder {
        format!("{}/", entry.title)
    } else {
        entry.title.clone()
    };

    let prefix = format!("{}{}", indent, icon);
    let available = max_width.saturating_sub(prefix.width());
    let text = format!("{}{}", prefix, truncate_to_width(&name, available));
    let padding = max_width.saturating_sub(text.width());

    let mut style = Style::default()
        .fg(if entry.is_folder { theme.tree_dir } else { theme.tree_file })
        .bg(if selected { theme.tree_selected_bg } else { theme.sidebar_bg });
    if bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if current_folder && entry.is_folder {
        style = style.add_modifier(Modifier::UNDERLINED);
    }

    Line::from(Span::styled(format!("{}{}", text, " ".repeat(padding)), style))
}

/// Cut `text` to at most `width` display columns, ending in `…` when shortened
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    if width > 0 {
        out.push('…');
    }
    out
}

/// Get the tree entry index at a given screen position
pub fn entry_at_position(app: &App, x: u16, y: u16) -> Option<usize> {
    let area = app.file_tree_area?;

    if x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height {
        app.sync.tree.index_at_row((y - area.y) as usize)
    } else {
        None
    }
}
