use crate::app::App;
use ratatui::{prelude::*, widgets::Paragraph};
use unicode_width::UnicodeWidthStr;

/// Draw the tab bar showing open files
pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let bg_style = Style::default().fg(theme.tab_inactive_fg).bg(theme.tabbar_bg);

    let mut spans: Vec<Span> = Vec::new();
    let mut used = 0usize;
    let active = app.sync.active_index();

    for (i, tab) in app.sync.tabs().iter().enumerate() {
        let (fg, bg) = if Some(i) == active {
            (theme.tab_active_fg, theme.tab_active_bg)
        } else {
            (theme.tab_inactive_fg, theme.tab_inactive_bg)
        };

        // " title* │"
        let label = format!(" {}", tab.title());
        let marker = if tab.dirty { "*" } else { "" };
        let width = label.width() + marker.len() + 2;
        if used + width > area.width as usize {
            break;
        }

        spans.push(Span::styled(label, Style::default().fg(fg).bg(bg)));
        spans.push(Span::styled(marker, Style::default().fg(theme.tab_dirty).bg(bg)));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
        spans.push(Span::styled("│", bg_style));
        used += width;
    }

    let remaining = (area.width as usize).saturating_sub(used);
    if remaining > 0 {
        spans.push(Span::styled(" ".repeat(remaining), bg_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
