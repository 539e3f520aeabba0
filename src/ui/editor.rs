use crate::app::App;
use crate::connector::FileInfo;
use crate::highlighting::{HighlightStyle, StyledSpan};
use crate::theme::Theme;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Draw the editor pane for the active tab
pub fn draw(frame: &mut Frame, app: &mut App, area: Rect, focused: bool) {
    let border_color = if focused {
        app.theme.border_focused
    } else {
        app.theme.border
    };

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(app.theme.editor_bg));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Store editor area for paging and mouse handling
    app.editor_area = Some(inner);

    let Some(tab) = app.sync.active() else {
        draw_placeholder(frame, &app.theme, inner);
        return;
    };
    if let Some(info) = &tab.preview {
        draw_preview(frame, &app.theme, info, inner);
        return;
    }

    let gutter_width = if app.show_line_numbers {
        tab.editor
            .as_ref()
            .map_or(0, |doc| gutter_width(doc.line_count()))
    } else {
        0
    };
    let content_width = inner.width.saturating_sub(gutter_width) as usize;
    let visible_lines = inner.height as usize;
    if content_width == 0 || visible_lines == 0 {
        return;
    }

    app.sync
        .edit_active(|doc| doc.ensure_cursor_visible(visible_lines, content_width));

    let Some(doc) = app.sync.active().and_then(|t| t.editor.as_ref()) else {
        return;
    };
    let view = View {
        scroll_x: doc.scroll_x,
        cursor: (doc.cursor.line, doc.cursor.col),
        gutter_width,
        content_width,
        focused,
    };

    let lines: Vec<Line> = (doc.scroll_y..doc.scroll_y + visible_lines)
        .map(|line_idx| {
            if line_idx >= doc.line_count() {
                return past_end_line(&app.theme, &view);
            }
            let content = doc.buffer.line_text(line_idx);
            let highlighted = app.highlighting.highlight_line(&content, doc.mode);
            code_line(&app.theme, &view, line_idx, &content, highlighted.as_deref())
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// What a single frame of the editor shows
struct View {
    scroll_x: usize,
    cursor: (usize, usize),
    gutter_width: u16,
    content_width: usize,
    focused: bool,
}

fn gutter_span(theme: &Theme, view: &View, label: String, current: bool) -> Option<Span<'static>> {
    if view.gutter_width == 0 {
        return None;
    }
    let fg = if current {
        theme.line_number_current
    } else {
        theme.line_number
    };
    let width = (view.gutter_width - 1) as usize;
    Some(Span::styled(
        format!("{:>width$} ", label, width = width),
        Style::default().fg(fg).bg(theme.editor_bg),
    ))
}

fn past_end_line(theme: &Theme, view: &View) -> Line<'static> {
    let mut spans: Vec<Span> = gutter_span(theme, view, "~".to_string(), false).into_iter().collect();
    spans.push(Span::styled(
        " ".repeat(view.content_width),
        Style::default().bg(theme.editor_bg),
    ));
    Line::from(spans)
}

/// Render a code line with highlighting, the current-line band and the cursor
fn code_line(
    theme: &Theme,
    view: &View,
    line_idx: usize,
    content: &str,
    highlighted: Option<&[StyledSpan]>,
) -> Line<'static> {
    let current = line_idx == view.cursor.0;
    let mut spans: Vec<Span> = gutter_span(theme, view, (line_idx + 1).to_string(), current)
        .into_iter()
        .collect();

    let chars: Vec<char> = content.chars().collect();
    let styles = char_styles(highlighted, chars.len());

    for col in view.scroll_x..view.scroll_x + view.content_width {
        let ch = chars.get(col).copied().unwrap_or(' ');
        let ch = if ch == '\t' { ' ' } else { ch };
        let hl = styles.get(col).copied().unwrap_or_default();

        let style = if view.focused && current && col == view.cursor.1 {
            Style::default().fg(theme.editor_bg).bg(theme.cursor)
        } else {
            let bg = if current {
                theme.line_highlight
            } else {
                theme.editor_bg
            };
            let mut style = Style::default().fg(hl.fg.unwrap_or(theme.fg)).bg(bg);
            if hl.bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            if hl.italic {
                style = style.add_modifier(Modifier::ITALIC);
            }
            style
        };
        spans.push(Span::styled(ch.to_string(), style));
    }

    Line::from(spans)
}

/// Per-character styles from highlighted spans
fn char_styles(highlighted: Option<&[StyledSpan]>, len: usize) -> Vec<HighlightStyle> {
    let mut styles = vec![HighlightStyle::default(); len];
    if let Some(spans) = highlighted {
        let per_char = spans
            .iter()
            .flat_map(|span| span.text.chars().map(move |_| span.style));
        for (slot, style) in styles.iter_mut().zip(per_char) {
            *slot = style;
        }
    }
    styles
}

/// Info panel for files that open as a preview
fn draw_preview(frame: &mut Frame, theme: &Theme, info: &FileInfo, area: Rect) {
    let label = Style::default().fg(theme.line_number);
    let value = Style::default().fg(theme.fg);
    let mut lines = vec![
        Line::from(Span::styled(
            info.filename.clone(),
            Style::default().fg(theme.tree_file).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled("Path: ", label), Span::styled(info.path.clone(), value)]),
        Line::from(vec![
            Span::styled("Type: ", label),
            Span::styled(info.file_type.clone(), value),
        ]),
    ];
    if let Some(size) = &info.properties.size {
        lines.push(Line::from(vec![Span::styled("Size: ", label), Span::styled(size.clone(), value)]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("No text editor for this file type.", label)));

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .style(Style::default().bg(theme.editor_bg));
    frame.render_widget(panel, area.inner(Margin::new(2, 1)));
}

fn draw_placeholder(frame: &mut Frame, theme: &Theme, area: Rect) {
    let text = "No file open\n\nEnter: open the selected file\nn: new file  N: new folder  u: upload";
    let placeholder = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(theme.line_number).bg(theme.editor_bg));
    frame.render_widget(placeholder, area.inner(Margin::new(0, area.height / 3)));
}

/// Width of the line number column, including its trailing space
fn gutter_width(line_count: usize) -> u16 {
    let digits = line_count.max(1).to_string().len() as u16;
    digits.max(3) + 1
}
