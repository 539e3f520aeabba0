use crate::config::Config;
use crate::connector::{ContentSource, LocalConnector};
use crate::error::ActionError;
use crate::highlighting::HighlightingManager;
use crate::input::{map_key_event, map_tree_key, AppEvent};
use crate::sync::{CloseChoice, CloseOutcome, FileTreeSync, SyncEvent};
use crate::theme::Theme;
use crate::ui::dialog::{Prompt, PromptKind};
use crate::ui::{self, Pane};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The main application state
pub struct App {
    pub should_quit: bool,
    pub focused_pane: Pane,
    /// Sidebar width as percentage (0-100)
    pub sidebar_width_percent: u16,
    pub show_line_numbers: bool,
    pub theme: Theme,
    /// Tree, tabs and the connector behind them
    pub sync: FileTreeSync<LocalConnector>,
    /// Display name of the resource root
    pub root_name: String,
    /// Last known file tree area for mouse hit detection
    pub file_tree_area: Option<Rect>,
    /// Last known editor area for paging and mouse hit detection
    pub editor_area: Option<Rect>,
    /// Active prompt (if any)
    pub prompt: Option<Prompt>,
    /// Message shown in the status bar until the next action
    pub status_message: Option<String>,
    pub highlighting: HighlightingManager,
}

impl App {
    /// Open the resource directory at `root` and load its tree
    pub fn new(config: Config, root: PathBuf) -> Result<Self> {
        let mut connector = LocalConnector::new(&root)
            .with_image_extensions(config.connector.image_extensions.clone())
            .with_show_hidden(config.file_tree.show_hidden);
        if !config.connector.authenticator.is_empty() {
            connector = connector.with_authenticator(config.connector.authenticator.clone());
        }

        let mut sync = FileTreeSync::new(connector)
            .with_authenticator(config.connector.authenticator.clone())
            .with_indent(config.editor.tab_width, config.editor.insert_spaces);
        sync.load_tree()?;

        let mut highlighting = HighlightingManager::new();
        if !highlighting.set_theme(&config.ui.theme) {
            log::warn!("unknown theme {}, keeping {}", config.ui.theme, highlighting.current_theme);
        }

        let theme = Theme::named(&config.ui.color_scheme).unwrap_or_else(|| {
            log::warn!("unknown color scheme {}, using dark", config.ui.color_scheme);
            Theme::dark()
        });

        let root_name = root
            .canonicalize()
            .unwrap_or_else(|_| root.clone())
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("/")
            .to_string();
        log::info!("serving resources from {}", root.display());

        Ok(Self {
            should_quit: false,
            focused_pane: Pane::FileTree,
            sidebar_width_percent: config.ui.sidebar_width,
            show_line_numbers: config.editor.show_line_numbers,
            theme,
            sync,
            root_name,
            file_tree_area: None,
            editor_area: None,
            prompt: None,
            status_message: None,
            highlighting,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(key) if key.kind == event::KeyEventKind::Press => self.handle_key_event(key),
                    Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Turn queued sync events into log lines and a status message
    fn drain_sync_events(&mut self) {
        for event in self.sync.drain_events() {
            log::info!("{:?}", event);
            let message = match event {
                SyncEvent::Selected(_) => continue,
                SyncEvent::Loaded(path) => format!("Opened {}", path),
                SyncEvent::Renamed { from, to } => format!("{} -> {}", from, to),
                SyncEvent::Deleted(path) => format!("Deleted {}", path),
                SyncEvent::Closed(path) => format!("Closed {}", path),
                SyncEvent::Saved(path) => format!("Saved {}", path),
            };
            self.status_message = Some(message);
        }
    }

    /// Report the outcome of an action; failures are shown in a blocking prompt
    fn report<T>(&mut self, result: Result<T, ActionError>) -> Option<T> {
        self.drain_sync_events();
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("{}", e);
                self.prompt = Some(Prompt::error(e.to_string()));
                None
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        self.status_message = None;

        if let Some(event) = map_key_event(key) {
            self.handle_app_event(event);
            return;
        }

        match self.focused_pane {
            Pane::FileTree => self.handle_file_tree_key(key),
            Pane::Editor => self.handle_editor_key(key),
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {
                if self.sync.has_unsaved_changes() {
                    self.prompt = Some(Prompt::new(PromptKind::QuitWithUnsaved));
                } else {
                    self.should_quit = true;
                }
            }
            AppEvent::ReloadTree => {
                let result = self.sync.load_tree();
                if self.report(result).is_some() {
                    self.status_message = Some("Tree reloaded".to_string());
                }
            }
            AppEvent::FocusFileTree => self.focused_pane = Pane::FileTree,
            AppEvent::FocusEditor => self.focused_pane = Pane::Editor,
            AppEvent::CycleFocus => {
                self.focused_pane = match self.focused_pane {
                    Pane::FileTree => Pane::Editor,
                    Pane::Editor => Pane::FileTree,
                }
            }
            AppEvent::Save => {
                if let Some(path) = self.sync.active_path().map(str::to_string) {
                    let result = self.sync.save_file(&path);
                    self.report(result);
                }
            }
            AppEvent::CloseTab => {
                if let Some(path) = self.sync.active_path().map(str::to_string) {
                    self.close_tab(&path);
                }
            }
            AppEvent::NextTab => self.sync.next_tab(),
            AppEvent::PreviousTab => self.sync.prev_tab(),
            AppEvent::GoToTab(n) => {
                let count = self.sync.tabs().len();
                let index = if n == 0 {
                    count.saturating_sub(1)
                } else {
                    n as usize - 1
                };
                self.sync.activate_index(index);
            }
            AppEvent::NewFile => {
                let folder = self.target_folder();
                self.prompt = Some(Prompt::new(PromptKind::NewFile { folder }));
            }
            AppEvent::NewFolder => {
                let folder = self.target_folder();
                self.prompt = Some(Prompt::new(PromptKind::NewFolder { folder }));
            }
            AppEvent::Upload => {
                let folder = self.target_folder();
                self.prompt = Some(Prompt::new(PromptKind::Upload {
                    folder,
                    replace_path: None,
                }));
            }
            AppEvent::ReplaceItem => {
                if let Some(entry) = self.sync.tree.selected_entry().filter(|e| !e.is_folder) {
                    let path = entry.key.clone();
                    self.prompt = Some(Prompt::new(PromptKind::Upload {
                        folder: crate::resource_path::parent(&path),
                        replace_path: Some(path),
                    }));
                }
            }
            AppEvent::RenameItem => {
                if let Some(path) = self.selected_item() {
                    self.prompt = Some(Prompt::new(PromptKind::Rename { path }));
                }
            }
            AppEvent::DeleteItem => {
                if let Some(path) = self.selected_item() {
                    self.prompt = Some(Prompt::new(PromptKind::ConfirmDelete { path }));
                }
            }
            AppEvent::MoveItem => {
                if let Some(path) = self.selected_item() {
                    let folders = self.sync.folder_tree();
                    if let Some(folders) = self.report(folders) {
                        self.prompt = Some(Prompt::new(PromptKind::Move { path, folders }));
                    }
                }
            }
            AppEvent::ShowInfo => {
                if let Some(key) = self.sync.tree.selected_key().map(str::to_string) {
                    let info = self.sync.connector().get_info(&key).map_err(ActionError::from);
                    if let Some(info) = self.report(info) {
                        let items = if info.is_dir() {
                            let listing = self.sync.folder_listing(&key);
                            self.report(listing).map(|entries| entries.len())
                        } else {
                            None
                        };
                        if self.prompt.is_none() {
                            self.prompt = Some(Prompt::new(PromptKind::Info { info, items }));
                        }
                    }
                }
            }
            AppEvent::Download => {
                if let Some(entry) = self.sync.tree.selected_entry().filter(|e| !e.is_folder) {
                    let path = entry.key.clone();
                    self.prompt = Some(Prompt::new(PromptKind::Download { path }));
                }
            }
        }
    }

    /// The selected tree node, unless it is the root
    fn selected_item(&self) -> Option<String> {
        self.sync
            .tree
            .selected_key()
            .filter(|k| *k != crate::file_tree::ROOT_KEY)
            .map(str::to_string)
    }

    /// Folder of the tree selection when the tree has focus, else the current folder
    fn target_folder(&self) -> String {
        if self.focused_pane == Pane::FileTree {
            if let Some(folder) = self
                .sync
                .tree
                .selected_key()
                .and_then(|k| self.sync.tree.folder_of(k))
            {
                return folder;
            }
        }
        self.sync.current_folder().to_string()
    }

    fn close_tab(&mut self, path: &str) {
        let result = self.sync.close(path, false);
        if let Some(CloseOutcome::NeedsConfirmation) = self.report(result) {
            self.prompt = Some(Prompt::new(PromptKind::UnsavedChanges {
                path: path.to_string(),
            }));
        }
    }

    /// Open the selected file, or toggle the selected folder
    fn activate_tree_selection(&mut self) {
        let Some(entry) = self.sync.tree.selected_entry().cloned() else {
            return;
        };
        self.sync.select_node(&entry.key);
        if entry.is_folder {
            self.sync.tree.toggle_expand();
        } else {
            let result = self.sync.open(&entry.key);
            if self.report(result).is_some() {
                self.focused_pane = Pane::Editor;
            }
        }
        self.drain_sync_events();
    }

    fn handle_file_tree_key(&mut self, key: KeyEvent) {
        if let Some(event) = map_tree_key(key) {
            self.handle_app_event(event);
            return;
        }

        if matches!(key.code, KeyCode::Enter | KeyCode::Right | KeyCode::Char('l')) {
            self.activate_tree_selection();
            return;
        }

        let tree = &mut self.sync.tree;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => tree.move_up(),
            KeyCode::Down | KeyCode::Char('j') => tree.move_down(),
            KeyCode::Left | KeyCode::Char('h') => tree.collapse_or_parent(),
            KeyCode::Home | KeyCode::Char('g') => tree.go_to_top(),
            KeyCode::End | KeyCode::Char('G') => tree.go_to_bottom(),
            KeyCode::PageUp => tree.page_up(10),
            KeyCode::PageDown => tree.page_down(10),
            _ => {}
        }
    }

    fn editor_page_size(&self) -> usize {
        self.editor_area
            .map(|a| a.height.saturating_sub(1) as usize)
            .unwrap_or(20)
            .max(1)
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);
        let page = self.editor_page_size();

        self.sync.edit_active(|doc| match key.code {
            KeyCode::Left => doc.move_left(),
            KeyCode::Right => doc.move_right(),
            KeyCode::Up => doc.move_up(),
            KeyCode::Down => doc.move_down(),
            KeyCode::Home if ctrl => doc.move_to_start(),
            KeyCode::Home => doc.move_to_line_start(),
            KeyCode::End if ctrl => doc.move_to_end(),
            KeyCode::End => doc.move_to_line_end(),
            KeyCode::PageUp => doc.page_up(page),
            KeyCode::PageDown => doc.page_down(page),

            KeyCode::Backspace => doc.backspace(),
            KeyCode::Delete => doc.delete(),
            KeyCode::Enter => doc.insert_newline(),
            KeyCode::Tab => doc.insert_tab(),
            KeyCode::Char(c) if !ctrl && !alt => doc.insert_char(c),
            _ => {}
        });
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };

        if prompt.takes_input() {
            match key.code {
                KeyCode::Esc => {}
                KeyCode::Enter => self.submit_prompt(prompt),
                KeyCode::Backspace => {
                    prompt.handle_backspace();
                    self.prompt = Some(prompt);
                }
                KeyCode::Char(c) => {
                    prompt.handle_input(c);
                    self.prompt = Some(prompt);
                }
                _ => self.prompt = Some(prompt),
            }
            return;
        }

        match prompt.kind {
            PromptKind::ConfirmDelete { path } => {
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) {
                    let result = self.sync.delete_item(&path);
                    self.report(result);
                } else if !matches!(key.code, KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc) {
                    self.prompt = Some(Prompt::new(PromptKind::ConfirmDelete { path }));
                }
            }
            PromptKind::UnsavedChanges { path } => {
                let choice = match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => CloseChoice::SaveAndClose,
                    KeyCode::Char('n') | KeyCode::Char('N') => CloseChoice::DiscardAndClose,
                    KeyCode::Esc | KeyCode::Char('c') => CloseChoice::Cancel,
                    _ => {
                        self.prompt = Some(Prompt::new(PromptKind::UnsavedChanges { path }));
                        return;
                    }
                };
                let result = self.sync.resolve_close(&path, choice);
                self.report(result);
            }
            PromptKind::QuitWithUnsaved => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.should_quit = true,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                _ => self.prompt = Some(Prompt::new(PromptKind::QuitWithUnsaved)),
            },
            PromptKind::Move { path, mut folders } => {
                match key.code {
                    KeyCode::Esc => return,
                    KeyCode::Enter => {
                        if let Some(target) = folders.selected_key().map(str::to_string) {
                            let result = self.sync.move_item(&path, &target);
                            self.report(result);
                        }
                        return;
                    }
                    KeyCode::Up | KeyCode::Char('k') => folders.move_up(),
                    KeyCode::Down | KeyCode::Char('j') => folders.move_down(),
                    KeyCode::Right | KeyCode::Char('l') => folders.toggle_expand(),
                    KeyCode::Left | KeyCode::Char('h') => folders.collapse_or_parent(),
                    KeyCode::PageUp => folders.page_up(10),
                    KeyCode::PageDown => folders.page_down(10),
                    _ => {}
                }
                self.prompt = Some(Prompt::new(PromptKind::Move { path, folders }));
            }
            // Any key dismisses
            PromptKind::Info { .. } | PromptKind::Error { .. } => {}
            PromptKind::Rename { .. }
            | PromptKind::NewFile { .. }
            | PromptKind::NewFolder { .. }
            | PromptKind::Upload { .. }
            | PromptKind::Download { .. } => {}
        }
    }

    /// Run the action behind a text prompt. Invalid names keep the prompt open.
    fn submit_prompt(&mut self, mut prompt: Prompt) {
        let input = prompt.input.trim().to_string();
        let result = match &prompt.kind {
            PromptKind::Rename { path } => self.sync.rename_item(path, &input).map(|_| ()),
            PromptKind::NewFile { folder } => self.sync.add_new_file(folder, &input).map(|_| ()),
            PromptKind::NewFolder { folder } => self.sync.add_new_folder(folder, &input).map(|_| ()),
            PromptKind::Upload { folder, replace_path } => {
                if input.is_empty() {
                    Err(ActionError::NoFileName)
                } else {
                    self.sync
                        .upload_file(folder, Path::new(&input), replace_path.as_deref())
                        .map(|_| ())
                }
            }
            PromptKind::Download { path } => {
                if input.is_empty() {
                    Err(ActionError::NoFileName)
                } else {
                    self.sync.download_file(path, Path::new(&input)).map(|bytes| {
                        self.status_message = Some(format!("Wrote {} bytes to {}", bytes, input));
                    })
                }
            }
            _ => Ok(()),
        };

        match result {
            Err(e @ (ActionError::NoFileName | ActionError::InvalidFileName)) => {
                prompt.error = Some(e.to_string());
                self.prompt = Some(prompt);
            }
            other => {
                if self.report(other).is_some() && matches!(prompt.kind, PromptKind::NewFile { .. }) {
                    self.focused_pane = Pane::Editor;
                }
            }
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.prompt.is_some() {
            return;
        }
        let in_tree = ui::file_tree::entry_at_position(self, mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = in_tree {
                    self.focused_pane = Pane::FileTree;
                    let already_selected = self.sync.tree.selected == index;
                    self.sync.tree.select_index(index);
                    if already_selected {
                        self.activate_tree_selection();
                    }
                } else if self.in_editor(mouse.column, mouse.row) {
                    self.focused_pane = Pane::Editor;
                }
            }
            // The view follows the cursor, so the wheel moves the cursor
            MouseEventKind::ScrollUp if self.in_editor(mouse.column, mouse.row) => {
                self.sync.edit_active(|doc| (0..3).for_each(|_| doc.move_up()));
            }
            MouseEventKind::ScrollDown if self.in_editor(mouse.column, mouse.row) => {
                self.sync.edit_active(|doc| (0..3).for_each(|_| doc.move_down()));
            }
            MouseEventKind::ScrollUp => self.sync.tree.move_up(),
            MouseEventKind::ScrollDown => self.sync.tree.move_down(),
            _ => {}
        }
    }

    fn in_editor(&self, x: u16, y: u16) -> bool {
        self.editor_area
            .map_or(false, |a| x >= a.x && x < a.x + a.width && y >= a.y && y < a.y + a.height)
    }
}
