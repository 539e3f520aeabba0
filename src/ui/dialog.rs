use crate::app::App;
use crate::connector::FileInfo;
use crate::file_tree::FileTree;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// What a modal prompt is asking for
#[derive(Debug, Clone)]
pub enum PromptKind {
    /// New name for a file or folder
    Rename { path: String },
    ConfirmDelete { path: String },
    /// Name of a file to create in `folder`
    NewFile { folder: String },
    NewFolder { folder: String },
    /// Local path of a file to upload into `folder`, optionally over `replace_path`
    Upload {
        folder: String,
        replace_path: Option<String>,
    },
    /// Pick the folder to move `path` into
    Move { path: String, folders: FileTree },
    /// Local destination for a copy of `path`
    Download { path: String },
    /// Closing a tab with unsaved changes
    UnsavedChanges { path: String },
    QuitWithUnsaved,
    /// `items` is the entry count for folders
    Info { info: FileInfo, items: Option<usize> },
    Error { message: String },
}

/// An open modal prompt
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    /// Text typed so far, for prompts that take a name or path
    pub input: String,
    /// Validation message shown under the input
    pub error: Option<String>,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        let input = match &kind {
            PromptKind::Rename { path } | PromptKind::Download { path } => {
                crate::resource_path::file_name(path).to_string()
            }
            _ => String::new(),
        };
        Self {
            kind,
            input,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(PromptKind::Error {
            message: message.into(),
        })
    }

    /// Whether the prompt has a text field
    pub fn takes_input(&self) -> bool {
        matches!(
            self.kind,
            PromptKind::Rename { .. }
                | PromptKind::NewFile { .. }
                | PromptKind::NewFolder { .. }
                | PromptKind::Upload { .. }
                | PromptKind::Download { .. }
        )
    }

    pub fn handle_input(&mut self, c: char) {
        self.input.push(c);
        self.error = None;
    }

    pub fn handle_backspace(&mut self) {
        self.input.pop();
        self.error = None;
    }

    fn title(&self) -> &'static str {
        match self.kind {
            PromptKind::Rename { .. } => "Rename",
            PromptKind::ConfirmDelete { .. } => "Delete",
            PromptKind::NewFile { .. } => "New File",
            PromptKind::NewFolder { .. } => "New Folder",
            PromptKind::Upload {
                replace_path: Some(_),
                ..
            } => "Replace File",
            PromptKind::Upload { .. } => "Upload File",
            PromptKind::Move { .. } => "Move To",
            PromptKind::Download { .. } => "Download",
            PromptKind::UnsavedChanges { .. } => "Unsaved Changes",
            PromptKind::QuitWithUnsaved => "Quit",
            PromptKind::Info { .. } => "Info",
            PromptKind::Error { .. } => "Error",
        }
    }

    fn message(&self) -> String {
        match &self.kind {
            PromptKind::Rename { path } => format!("Rename {} to:", path),
            PromptKind::ConfirmDelete { path } => format!("Delete {}?", path),
            PromptKind::NewFile { folder } => format!("New file in {}:", folder),
            PromptKind::NewFolder { folder } => format!("New folder in {}:", folder),
            PromptKind::Upload {
                replace_path: Some(path),
                ..
            } => format!("Local file to replace {} with:", path),
            PromptKind::Upload { folder, .. } => format!("Local file to upload into {}:", folder),
            PromptKind::Move { path, .. } => format!("Move {} into:", path),
            PromptKind::Download { path } => format!("Save a copy of {} as:", path),
            PromptKind::UnsavedChanges { path } => {
                format!("{} has unsaved changes. Save before closing?", path)
            }
            PromptKind::QuitWithUnsaved => "There are unsaved changes. Quit anyway?".to_string(),
            PromptKind::Info { info, items } => format_info(info, *items),
            PromptKind::Error { message } => message.clone(),
        }
    }

    fn help(&self) -> &'static str {
        match self.kind {
            PromptKind::ConfirmDelete { .. } | PromptKind::QuitWithUnsaved => "y: Yes  n/Esc: No",
            PromptKind::UnsavedChanges { .. } => "y: Save  n: Discard  Esc: Cancel",
            PromptKind::Move { .. } => "Enter: Move  Esc: Cancel",
            PromptKind::Info { .. } | PromptKind::Error { .. } => "Press any key",
            _ => "Enter: OK  Esc: Cancel",
        }
    }
}

fn format_info(info: &FileInfo, items: Option<usize>) -> String {
    let mut lines = vec![
        format!("Name: {}", info.filename),
        format!("Path: {}", info.path),
        format!("Type: {}", if info.is_dir() { "folder" } else { info.file_type.as_str() }),
    ];
    if let Some(size) = &info.properties.size {
        lines.push(format!("Size: {}", size));
    }
    if let Some(items) = items {
        lines.push(format!("Items: {}", items));
    }
    if let Some(modified) = info.properties.date_modified {
        lines.push(format!("Modified: {} (unix time)", modified));
    }
    lines.join("\n")
}

/// Rectangle of the given size centered in `area`
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Draw the active prompt (if any) on top of everything else
pub fn draw_prompt(frame: &mut Frame, app: &mut App) {
    let theme = app.theme.clone();
    let Some(prompt) = app.prompt.as_mut() else {
        return;
    };

    let message = prompt.message();
    let message_lines = message.lines().count().max(1) as u16;
    let list_height = match &prompt.kind {
        PromptKind::Move { .. } => 12,
        _ => 0,
    };
    let input_height = if prompt.takes_input() { 2 } else { 0 };
    let height = message_lines + input_height + list_height + 4;
    let width = message.lines().map(|l| l.len() as u16).max().unwrap_or(0).max(40) + 4;
    let dialog_area = centered(frame.area(), width.min(70), height);

    frame.render_widget(Clear, dialog_area);

    let border = match prompt.kind {
        PromptKind::Error { .. } => theme.error,
        _ => theme.border_focused,
    };
    let block = Block::default()
        .title(format!(" {} ", prompt.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.dialog_bg));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(message_lines),
            Constraint::Length(input_height),
            Constraint::Min(list_height),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(theme.fg))
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    if prompt.takes_input() {
        let input = Paragraph::new(format!("{}|", prompt.input))
            .style(Style::default().fg(theme.fg).bg(theme.editor_bg));
        frame.render_widget(input, Rect { height: 1, ..chunks[1] });

        if let Some(error) = &prompt.error {
            let error_area = Rect {
                y: chunks[1].y + 1,
                height: 1,
                ..chunks[1]
            };
            frame.render_widget(
                Paragraph::new(error.as_str()).style(Style::default().fg(theme.error)),
                error_area,
            );
        }
    }

    if let PromptKind::Move { folders, .. } = &mut prompt.kind {
        draw_folder_list(frame, &theme, folders, chunks[2]);
    }

    let help = Paragraph::new(prompt.help())
        .style(Style::default().fg(theme.line_number))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

/// Folder picker for the move prompt
fn draw_folder_list(frame: &mut Frame, theme: &crate::theme::Theme, folders: &mut FileTree, area: Rect) {
    let visible = area.height as usize;
    folders.ensure_visible_with_height(visible);

    let lines: Vec<Line> = folders
        .entries
        .iter()
        .enumerate()
        .skip(folders.scroll_offset)
        .take(visible)
        .map(|(i, entry)| {
            let bg = if i == folders.selected {
                theme.tree_selected_bg
            } else {
                theme.dialog_bg
            };
            let text = format!("{}{}", "  ".repeat(entry.depth), entry.title);
            Line::from(Span::styled(text, Style::default().fg(theme.tree_dir).bg(bg)))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}
