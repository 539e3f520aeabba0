//! Keeps the resource tree and the open tabs consistent.
//!
//! Every path rewrite in the application goes through [`FileTreeSync`]: a
//! rename or move updates the tree node, all of its descendants and every
//! tab at or beneath the old path in one step. Remote actions (the `*_item`,
//! `add_*`, `upload_file` and `save_file` methods) ask the connector first
//! and only touch local state once it reports success.

use crate::connector::{Connector, FileContent, FileInfo, MutationRequest, MutationResponse, Operation, Outcome};
use crate::editor::Document;
use crate::error::{ActionError, ConnectorError, Result};
use crate::file_tree::{FileTree, Node, ROOT_KEY};
use crate::resource_path;
use std::collections::VecDeque;
use std::path::Path;

/// An open tab
#[derive(Debug, Clone)]
pub struct OpenFile {
    pub path: String,
    pub dirty: bool,
    /// Text files get an editor
    pub editor: Option<Document>,
    /// Binary files only show their info
    pub preview: Option<FileInfo>,
    /// Editor revision at the last load or save
    clean_revision: u64,
}

impl OpenFile {
    fn from_content(path: &str, content: FileContent, tab_width: usize, use_spaces: bool) -> Self {
        let (editor, preview) = match content {
            FileContent::Text { ext, contents } => (
                Some(Document::from_content(&contents, &ext).with_indent(tab_width, use_spaces)),
                None,
            ),
            FileContent::Preview { info, .. } => (None, Some(info)),
        };
        Self {
            path: path.to_string(),
            dirty: false,
            editor,
            preview,
            clean_revision: 0,
        }
    }

    /// Tab label
    pub fn title(&self) -> &str {
        resource_path::file_name(&self.path)
    }

    fn revision(&self) -> u64 {
        self.editor.as_ref().map_or(0, Document::revision)
    }
}

/// Notifications for the host, drained in the order they happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A node was activated in the tree
    Selected(String),
    /// A file was opened in a new tab
    Loaded(String),
    Renamed { from: String, to: String },
    Deleted(String),
    Closed(String),
    Saved(String),
}

/// Result of asking to close a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The tab has unsaved changes; ask the user, then call `resolve_close`
    NeedsConfirmation,
    /// The user cancelled and the tab stays open
    Kept,
}

/// The user's answer to the unsaved-changes prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    SaveAndClose,
    DiscardAndClose,
    Cancel,
}

pub struct FileTreeSync<C> {
    pub tree: FileTree,
    tabs: Vec<OpenFile>,
    active: Option<usize>,
    connector: C,
    events: VecDeque<SyncEvent>,
    current_folder: String,
    authenticator: String,
    tab_width: usize,
    use_spaces: bool,
}

impl<C: Connector> FileTreeSync<C> {
    /// Start with a bare root; call [`load_tree`](Self::load_tree) to populate it
    pub fn new(connector: C) -> Self {
        Self {
            tree: FileTree::new(),
            tabs: Vec::new(),
            active: None,
            connector,
            events: VecDeque::new(),
            current_folder: ROOT_KEY.to_string(),
            authenticator: String::new(),
            tab_width: 4,
            use_spaces: true,
        }
    }

    /// Token sent along with every mutation
    pub fn with_authenticator(mut self, token: impl Into<String>) -> Self {
        self.authenticator = token.into();
        self
    }

    /// Indentation settings for newly opened editors
    pub fn with_indent(mut self, tab_width: usize, use_spaces: bool) -> Self {
        self.tab_width = tab_width;
        self.use_spaces = use_spaces;
        self
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    // ---- tabs ----

    pub fn tabs(&self) -> &[OpenFile] {
        &self.tabs
    }

    pub fn tab(&self, path: &str) -> Option<&OpenFile> {
        self.tabs.iter().find(|t| t.path == path)
    }

    fn tab_index(&self, path: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.path == path)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&OpenFile> {
        self.active.and_then(|i| self.tabs.get(i))
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active().map(|t| t.path.as_str())
    }

    /// Activate the tab at `index`
    pub fn activate_index(&mut self, index: usize) {
        if index < self.tabs.len() {
            self.active = Some(index);
            self.current_folder = resource_path::parent(&self.tabs[index].path);
        }
    }

    /// Activate an open tab by path
    pub fn activate(&mut self, path: &str) -> bool {
        match self.tab_index(path) {
            Some(index) => {
                self.activate_index(index);
                true
            }
            None => false,
        }
    }

    pub fn next_tab(&mut self) {
        if let Some(i) = self.active {
            self.activate_index((i + 1) % self.tabs.len());
        }
    }

    pub fn prev_tab(&mut self) {
        if let Some(i) = self.active {
            self.activate_index((i + self.tabs.len() - 1) % self.tabs.len());
        }
    }

    /// Remove a tab; if it was active, fall back to the previous tab, else the next
    fn remove_tab(&mut self, index: usize) -> OpenFile {
        let tab = self.tabs.remove(index);
        self.active = match self.active {
            Some(a) if a == index => {
                if index > 0 {
                    Some(index - 1)
                } else if !self.tabs.is_empty() {
                    Some(0)
                } else {
                    None
                }
            }
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        if let Some(path) = self.active_path() {
            self.current_folder = resource_path::parent(path);
        }
        self.events.push_back(SyncEvent::Closed(tab.path.clone()));
        tab
    }

    // ---- current folder ----

    /// Folder used by actions without an explicit target
    pub fn current_folder(&self) -> &str {
        &self.current_folder
    }

    /// Activate a node in the tree and remember its folder
    pub fn select_node(&mut self, key: &str) -> bool {
        let Some(folder) = self.tree.folder_of(key) else {
            return false;
        };
        self.tree.select_key(key);
        self.current_folder = folder;
        self.events.push_back(SyncEvent::Selected(key.to_string()));
        true
    }

    pub fn drain_events(&mut self) -> Vec<SyncEvent> {
        self.events.drain(..).collect()
    }

    // ---- local consistency ----

    /// Rewrite `old` and everything beneath it to `new`, in the tree and in
    /// the tabs. Unknown paths are ignored. Returns whether anything changed.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old == new || !self.tree.relocate(old, new) {
            log::debug!("rename {} -> {}: nothing to do", old, new);
            return false;
        }
        self.rekey_open_files(old, new);
        self.events.push_back(SyncEvent::Renamed {
            from: old.to_string(),
            to: new.to_string(),
        });
        true
    }

    /// Move `path` into the folder `new_parent`, rewriting paths as in `rename`
    pub fn move_node(&mut self, path: &str, new_parent: &str) -> Result<bool> {
        if path == ROOT_KEY {
            return Err(ActionError::RootNode);
        }
        if resource_path::is_within(new_parent, path) {
            return Err(ActionError::MoveIntoDescendant);
        }
        if !self.tree.contains(path) {
            return Ok(false);
        }
        match self.tree.get(new_parent) {
            Some(folder) if folder.is_folder => {}
            _ => return Err(ActionError::UnknownPath(new_parent.to_string())),
        }
        let new_path = resource_path::join(new_parent, resource_path::file_name(path));
        if new_path != path && self.tree.contains(&new_path) {
            return Err(ActionError::AlreadyExists(new_path));
        }
        Ok(self.rename(path, &new_path))
    }

    fn rekey_open_files(&mut self, old: &str, new: &str) {
        for tab in &mut self.tabs {
            if let Some(path) = resource_path::rebase(&tab.path, old, new) {
                log::debug!("tab {} is now {}", tab.path, path);
                tab.path = path;
            }
        }
        if let Some(folder) = resource_path::rebase(&self.current_folder, old, new) {
            self.current_folder = folder;
        }
    }

    /// Drop the node at `path` and close every tab at or beneath it, unsaved or not
    pub fn delete(&mut self, path: &str) {
        if path == ROOT_KEY {
            return;
        }
        self.tree.remove(path);
        while let Some(index) = self
            .tabs
            .iter()
            .position(|t| resource_path::is_within(&t.path, path))
        {
            self.remove_tab(index);
        }
        if resource_path::is_within(&self.current_folder, path) {
            self.current_folder = resource_path::parent(path);
        }
        self.events.push_back(SyncEvent::Deleted(path.to_string()));
    }

    /// Open a file in a new tab, or activate the tab already showing it
    pub fn open(&mut self, path: &str) -> Result<()> {
        if self.activate(path) {
            return Ok(());
        }
        match self.tree.get(path) {
            Some(node) if !node.is_folder => {}
            _ => return Err(ActionError::UnknownPath(path.to_string())),
        }

        let content = self.connector.get_file(path)?;
        let mut tab = OpenFile::from_content(path, content, self.tab_width, self.use_spaces);
        tab.clean_revision = tab.revision();
        self.tabs.push(tab);
        self.activate_index(self.tabs.len() - 1);
        self.events.push_back(SyncEvent::Loaded(path.to_string()));
        log::debug!("opened {}", path);
        Ok(())
    }

    pub fn mark_dirty(&mut self, path: &str) -> bool {
        match self.tabs.iter_mut().find(|t| t.path == path) {
            Some(tab) => {
                tab.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_clean(&mut self, path: &str) -> bool {
        match self.tabs.iter_mut().find(|t| t.path == path) {
            Some(tab) => {
                tab.dirty = false;
                tab.clean_revision = tab.revision();
                true
            }
            None => false,
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.tabs.iter().any(|t| t.dirty)
    }

    /// Run an edit against the active editor, flagging the tab dirty if the
    /// buffer changed. `None` when no text tab is active.
    pub fn edit_active<R>(&mut self, edit: impl FnOnce(&mut Document) -> R) -> Option<R> {
        let tab = self.active.and_then(|i| self.tabs.get_mut(i))?;
        let doc = tab.editor.as_mut()?;
        let result = edit(doc);
        if !tab.dirty && doc.revision() != tab.clean_revision {
            let path = tab.path.clone();
            self.mark_dirty(&path);
        }
        Some(result)
    }

    /// Close a tab. Unsaved tabs stay open unless `force_discard` is set.
    pub fn close(&mut self, path: &str, force_discard: bool) -> Result<CloseOutcome> {
        let index = self
            .tab_index(path)
            .ok_or_else(|| ActionError::NotOpen(path.to_string()))?;
        if self.tabs[index].dirty && !force_discard {
            return Ok(CloseOutcome::NeedsConfirmation);
        }
        self.remove_tab(index);
        Ok(CloseOutcome::Closed)
    }

    /// Finish a close that needed confirmation
    pub fn resolve_close(&mut self, path: &str, choice: CloseChoice) -> Result<CloseOutcome> {
        match choice {
            CloseChoice::SaveAndClose => {
                self.save_file(path)?;
                self.close(path, true)
            }
            CloseChoice::DiscardAndClose => self.close(path, true),
            CloseChoice::Cancel => Ok(CloseOutcome::Kept),
        }
    }

    // ---- remote actions ----

    fn submit(&mut self, operation: Operation) -> Result<MutationResponse> {
        let mode = operation.mode();
        let request = MutationRequest::new(operation, self.authenticator.clone());
        let response = self.connector.submit(&request)?;
        if !response.is_ok() {
            log::info!("{} failed: {}", mode, response.error);
            return Err(ActionError::Remote(response.error));
        }
        Ok(response)
    }

    fn require_node(&self, path: &str) -> Result<()> {
        if path == ROOT_KEY {
            return Err(ActionError::RootNode);
        }
        if !self.tree.contains(path) {
            return Err(ActionError::UnknownPath(path.to_string()));
        }
        Ok(())
    }

    fn require_folder(&self, path: &str) -> Result<()> {
        match self.tree.get(path) {
            Some(node) if node.is_folder => Ok(()),
            _ => Err(ActionError::UnknownPath(path.to_string())),
        }
    }

    /// Rename a file or folder in place; returns the new key
    pub fn rename_item(&mut self, path: &str, new_name: &str) -> Result<String> {
        self.require_node(path)?;
        validate_name(new_name)?;

        let response = self.submit(Operation::Rename {
            path: path.to_string(),
            new_name: new_name.to_string(),
        })?;
        let new_key = match response.outcome {
            Outcome::Renamed {
                new_parent,
                new_name: renamed,
                ..
            } => resource_path::join(&new_parent, &renamed),
            _ => resource_path::join(&resource_path::parent(path), new_name),
        };
        self.rename(path, &new_key);
        Ok(new_key)
    }

    /// Move a file or folder into `target`, or into `target`'s folder when it
    /// is a file. Returns the new key.
    pub fn move_item(&mut self, path: &str, target: &str) -> Result<String> {
        self.require_node(path)?;
        let directory = self
            .tree
            .folder_of(target)
            .ok_or_else(|| ActionError::UnknownPath(target.to_string()))?;
        if resource_path::is_within(&directory, path) {
            return Err(ActionError::MoveIntoDescendant);
        }
        let new_path = resource_path::join(&directory, resource_path::file_name(path));
        if new_path != path && self.tree.contains(&new_path) {
            return Err(ActionError::AlreadyExists(new_path));
        }

        self.submit(Operation::Move {
            path: path.to_string(),
            directory: directory.clone(),
        })?;
        self.move_node(path, &directory)?;
        Ok(new_path)
    }

    pub fn delete_item(&mut self, path: &str) -> Result<()> {
        self.require_node(path)?;
        self.submit(Operation::Delete {
            path: path.to_string(),
        })?;
        self.delete(path);
        Ok(())
    }

    /// Create an empty file in `folder` and open it
    pub fn add_new_file(&mut self, folder: &str, name: &str) -> Result<String> {
        self.require_folder(folder)?;
        validate_name(name)?;

        let response = self.submit(Operation::AddNew {
            path: folder.to_string(),
            name: name.to_string(),
        })?;
        let (parent, key) = added_key(&response, folder, name);
        self.tree.add_child(&parent, Node::file(&key, resource_path::file_name(&key)));
        self.open(&key)?;
        Ok(key)
    }

    pub fn add_new_folder(&mut self, folder: &str, name: &str) -> Result<String> {
        self.require_folder(folder)?;
        validate_name(name)?;

        let response = self.submit(Operation::AddFolder {
            path: folder.to_string(),
            name: name.to_string(),
        })?;
        let (parent, key) = added_key(&response, folder, name);
        self.tree
            .add_child(&parent, Node::folder(&key, resource_path::file_name(&key)));
        Ok(key)
    }

    /// Upload a local file into `folder`, or over `replace_path`.
    ///
    /// A replaced file that is open gets its content reloaded; otherwise the
    /// uploaded file is opened.
    pub fn upload_file(&mut self, folder: &str, source: &Path, replace_path: Option<&str>) -> Result<String> {
        self.require_folder(folder)?;
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let response = self.submit(Operation::Add {
            path: folder.to_string(),
            source: source.to_path_buf(),
            replace_path: replace_path.map(str::to_string),
        })?;
        let (parent, key) = added_key(&response, folder, &name);
        if !self.tree.contains(&key) {
            self.tree.add_child(&parent, Node::file(&key, resource_path::file_name(&key)));
        }

        if self.tab_index(&key).is_some() {
            self.reload_tab(&key)?;
            self.activate(&key);
        } else {
            self.open(&key)?;
        }
        Ok(key)
    }

    /// Refetch the content of an open tab, dropping unsaved edits
    fn reload_tab(&mut self, path: &str) -> Result<()> {
        let content = self.connector.get_file(path)?;
        let Some(tab) = self.tabs.iter_mut().find(|t| t.path == path) else {
            return Err(ActionError::NotOpen(path.to_string()));
        };
        match content {
            FileContent::Text { ext, contents } => match tab.editor.as_mut() {
                Some(doc) => doc.replace_content(&contents),
                None => {
                    let doc = Document::from_content(&contents, &ext).with_indent(self.tab_width, self.use_spaces);
                    tab.editor = Some(doc);
                    tab.preview = None;
                }
            },
            FileContent::Preview { info, .. } => tab.preview = Some(info),
        }
        self.mark_clean(path);
        Ok(())
    }

    /// Write the editor content of an open tab through the connector
    pub fn save_file(&mut self, path: &str) -> Result<()> {
        let tab = self.tab(path).ok_or_else(|| ActionError::NotOpen(path.to_string()))?;
        let doc = tab
            .editor
            .as_ref()
            .ok_or_else(|| ActionError::NotEditable(path.to_string()))?;
        let text = doc.text();

        self.connector.save_file(path, &text)?;
        self.mark_clean(path);
        self.events.push_back(SyncEvent::Saved(path.to_string()));
        log::debug!("saved {}", path);
        Ok(())
    }

    /// Copy a stored file to `dest` on the local disk; returns the byte count
    pub fn download_file(&self, path: &str, dest: &Path) -> Result<usize> {
        match self.tree.get(path) {
            Some(node) if !node.is_folder => {}
            _ => return Err(ActionError::UnknownPath(path.to_string())),
        }
        let bytes = self.connector.download(path)?;
        std::fs::write(dest, &bytes).map_err(|e| ConnectorError::io(dest.display().to_string(), e))?;
        log::info!("downloaded {} to {}", path, dest.display());
        Ok(bytes.len())
    }

    /// Entries of a folder as the connector reports them
    pub fn folder_listing(&self, folder: &str) -> Result<Vec<FileInfo>> {
        self.require_folder(folder)?;
        Ok(self.connector.get_folder(folder)?)
    }

    /// (Re)populate the tree from the connector.
    ///
    /// Tabs whose file is gone are closed. Tabs with unsaved edits stay open
    /// and get their node back, so saving recreates the file.
    pub fn load_tree(&mut self) -> Result<()> {
        let data = self.connector.file_tree(false)?;
        self.tree.reload(data);

        let mut index = 0;
        while index < self.tabs.len() {
            let path = self.tabs[index].path.clone();
            if self.tree.contains(&path) {
                index += 1;
            } else if self.tabs[index].dirty && self.restore_node(&path) {
                log::warn!("{} is gone from the store, keeping its unsaved edits", path);
                index += 1;
            } else {
                log::info!("closing {}, which is gone from the store", path);
                self.remove_tab(index);
            }
        }
        if !self.tree.contains(&self.current_folder) {
            self.current_folder = ROOT_KEY.to_string();
        }
        Ok(())
    }

    /// Re-add a file node along with any missing folders above it
    fn restore_node(&mut self, path: &str) -> bool {
        let mut missing = Vec::new();
        let mut folder = resource_path::parent(path);
        while !self.tree.contains(&folder) {
            missing.push(folder.clone());
            folder = resource_path::parent(&folder);
        }
        for key in missing.into_iter().rev() {
            let node = Node::folder(&key, resource_path::file_name(&key));
            if !self.tree.add_child(&resource_path::parent(&key), node) {
                return false;
            }
        }
        let node = Node::file(path, resource_path::file_name(path));
        self.tree.add_child(&resource_path::parent(path), node)
    }

    /// A separate tree of folders only, for picking a move target
    pub fn folder_tree(&self) -> Result<FileTree> {
        let mut tree = FileTree::from_data(self.connector.file_tree(true)?);
        tree.expand_all();
        Ok(tree)
    }
}

/// Client-side name check run before any remote call
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ActionError::NoFileName);
    }
    if !resource_path::is_valid_file_name(name) {
        return Err(ActionError::InvalidFileName);
    }
    Ok(())
}

/// Parent and key of a freshly added item, preferring what the connector reports
fn added_key(response: &MutationResponse, folder: &str, name: &str) -> (String, String) {
    match &response.outcome {
        Outcome::Added { parent, name } => {
            let parent = resource_path::normalize_return(parent);
            let key = resource_path::join(&parent, name);
            (parent, key)
        }
        _ => (folder.to_string(), resource_path::join(folder, name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::LocalConnector;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, FileTreeSync<LocalConnector>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
        fs::create_dir_all(dir.path().join("docs2")).unwrap();
        fs::write(dir.path().join("docs/a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("docs/sub/b.txt"), "beta").unwrap();
        fs::write(dir.path().join("docs2/x.txt"), "ex").unwrap();
        fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();

        let mut sync = FileTreeSync::new(LocalConnector::new(dir.path()));
        sync.load_tree().unwrap();
        (dir, sync)
    }

    fn tab_paths<C: Connector>(sync: &FileTreeSync<C>) -> Vec<&str> {
        sync.tabs().iter().map(|t| t.path.as_str()).collect()
    }

    #[test]
    fn test_rename_folder_moves_descendants_and_tabs() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs/sub/b.txt").unwrap();
        sync.edit_active(|doc| doc.insert_str(">> ")).unwrap();
        sync.drain_events();

        assert!(sync.rename("/docs", "/archive"));

        assert!(!sync.tree.contains("/docs"));
        assert!(sync.tree.contains("/archive/a.txt"));
        assert!(sync.tree.contains("/archive/sub/b.txt"));
        assert!(sync.tree.keys().iter().all(|k| !resource_path::is_within(k, "/docs")));
        assert_eq!(tab_paths(&sync), vec!["/archive/a.txt", "/archive/sub/b.txt"]);

        // same editor, edits and dirty flag intact
        let moved = sync.tab("/archive/sub/b.txt").unwrap();
        assert!(moved.dirty);
        assert_eq!(moved.editor.as_ref().unwrap().text(), ">> beta");
        assert_eq!(sync.active_path(), Some("/archive/sub/b.txt"));
        assert_eq!(
            sync.drain_events(),
            vec![SyncEvent::Renamed {
                from: "/docs".to_string(),
                to: "/archive".to_string(),
            }]
        );
    }

    #[test]
    fn test_rename_matches_whole_segments_only() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs2/x.txt").unwrap();

        assert!(sync.rename("/docs", "/x"));

        assert_eq!(tab_paths(&sync), vec!["/docs2/x.txt"]);
        assert!(sync.tree.contains("/docs2/x.txt"));
        assert!(sync.tree.contains("/x/a.txt"));
    }

    #[test]
    fn test_rename_unknown_path_is_noop() {
        let (_dir, mut sync) = fixture();
        let before = sync.tree.keys();
        assert!(!sync.rename("/nope", "/other"));
        assert!(!sync.rename(ROOT_KEY, "/other"));
        assert_eq!(sync.tree.keys(), before);
        assert!(sync.drain_events().is_empty());
    }

    #[test]
    fn test_rename_onto_existing_path_changes_nothing() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs2/x.txt").unwrap();
        sync.drain_events();

        assert!(!sync.rename("/docs/a.txt", "/docs2/x.txt"));
        assert_eq!(
            sync.tree.keys().iter().filter(|k| k.as_str() == "/docs2/x.txt").count(),
            1
        );
        assert!(sync.tree.contains("/docs/a.txt"));
        assert_eq!(tab_paths(&sync), vec!["/docs/a.txt", "/docs2/x.txt"]);
        assert!(sync.drain_events().is_empty());
    }

    #[test]
    fn test_move_onto_existing_name_is_rejected() {
        let (dir, mut sync) = fixture();
        fs::write(dir.path().join("docs2/a.txt"), "other").unwrap();
        sync.load_tree().unwrap();
        sync.open("/docs/a.txt").unwrap();

        assert!(matches!(
            sync.move_node("/docs/a.txt", "/docs2"),
            Err(ActionError::AlreadyExists(_))
        ));
        assert!(matches!(
            sync.move_item("/docs/a.txt", "/docs2"),
            Err(ActionError::AlreadyExists(_))
        ));
        assert_eq!(fs::read_to_string(dir.path().join("docs/a.txt")).unwrap(), "alpha");
        assert!(sync.tree.contains("/docs/a.txt"));
        assert_eq!(tab_paths(&sync), vec!["/docs/a.txt"]);
    }

    #[test]
    fn test_reload_closes_tabs_of_vanished_files() {
        let (dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs2/x.txt").unwrap();
        sync.select_node("/docs2/x.txt");
        sync.drain_events();

        fs::remove_dir_all(dir.path().join("docs2")).unwrap();
        sync.load_tree().unwrap();

        assert!(!sync.tree.contains("/docs2/x.txt"));
        assert_eq!(tab_paths(&sync), vec!["/docs/a.txt"]);
        assert_eq!(sync.active_path(), Some("/docs/a.txt"));
        assert_eq!(sync.current_folder(), "/docs");
        assert_eq!(
            sync.drain_events(),
            vec![SyncEvent::Closed("/docs2/x.txt".to_string())]
        );
        assert!(sync.tabs().iter().all(|t| sync.tree.contains(&t.path)));
    }

    #[test]
    fn test_reload_keeps_unsaved_tab_of_vanished_file() {
        let (dir, mut sync) = fixture();
        sync.open("/docs/sub/b.txt").unwrap();
        sync.edit_active(|doc| doc.insert_str("draft ")).unwrap();

        fs::remove_dir_all(dir.path().join("docs/sub")).unwrap();
        sync.load_tree().unwrap();

        assert!(sync.tree.get("/docs/sub").unwrap().is_folder);
        assert!(sync.tree.contains("/docs/sub/b.txt"));
        assert!(sync.tab("/docs/sub/b.txt").unwrap().dirty);

        sync.save_file("/docs/sub/b.txt").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/sub/b.txt")).unwrap(),
            "draft beta"
        );
    }

    #[test]
    fn test_open_is_idempotent() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs2/x.txt").unwrap();
        assert_eq!(sync.active_index(), Some(1));

        sync.open("/docs/a.txt").unwrap();
        assert_eq!(sync.tabs().len(), 2);
        assert_eq!(sync.active_path(), Some("/docs/a.txt"));
        assert_eq!(sync.current_folder(), "/docs");
    }

    #[test]
    fn test_open_rejects_unknown_paths_and_folders() {
        let (_dir, mut sync) = fixture();
        assert!(matches!(sync.open("/missing.txt"), Err(ActionError::UnknownPath(_))));
        assert!(matches!(sync.open("/docs"), Err(ActionError::UnknownPath(_))));
        assert!(sync.tabs().is_empty());
    }

    #[test]
    fn test_open_image_shows_preview() {
        let (_dir, mut sync) = fixture();
        sync.open("/logo.png").unwrap();
        let tab = sync.active().unwrap();
        assert!(tab.editor.is_none());
        assert_eq!(tab.preview.as_ref().unwrap().file_type, "png");
        assert!(matches!(sync.save_file("/logo.png"), Err(ActionError::NotEditable(_))));
    }

    #[test]
    fn test_delete_active_tab_falls_back_to_previous() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs/sub/b.txt").unwrap();
        sync.open("/docs2/x.txt").unwrap();
        sync.activate("/docs/sub/b.txt");

        sync.delete("/docs/sub/b.txt");
        assert_eq!(tab_paths(&sync), vec!["/docs/a.txt", "/docs2/x.txt"]);
        assert_eq!(sync.active_path(), Some("/docs/a.txt"));
    }

    #[test]
    fn test_delete_first_active_tab_falls_back_to_next() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs2/x.txt").unwrap();
        sync.activate("/docs/a.txt");

        sync.delete("/docs/a.txt");
        assert_eq!(sync.active_path(), Some("/docs2/x.txt"));

        sync.delete("/docs2");
        assert!(sync.tabs().is_empty());
        assert_eq!(sync.active_index(), None);
    }

    #[test]
    fn test_delete_folder_closes_tabs_beneath_it() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs/sub/b.txt").unwrap();
        sync.open("/docs2/x.txt").unwrap();
        sync.mark_dirty("/docs/a.txt");
        sync.drain_events();

        sync.delete("/docs");
        assert_eq!(tab_paths(&sync), vec!["/docs2/x.txt"]);
        assert_eq!(sync.active_path(), Some("/docs2/x.txt"));
        assert!(!sync.tree.contains("/docs/sub"));
        assert_eq!(
            sync.drain_events(),
            vec![
                SyncEvent::Closed("/docs/a.txt".to_string()),
                SyncEvent::Closed("/docs/sub/b.txt".to_string()),
                SyncEvent::Deleted("/docs".to_string()),
            ]
        );
    }

    #[test]
    fn test_active_tab_after_removing_an_earlier_tab() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs2/x.txt").unwrap();
        sync.close("/docs/a.txt", false).unwrap();
        assert_eq!(sync.active_index(), Some(0));
        assert_eq!(sync.active_path(), Some("/docs2/x.txt"));
    }

    #[test]
    fn test_close_dirty_needs_confirmation() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.mark_dirty("/docs/a.txt");

        assert_eq!(sync.close("/docs/a.txt", false).unwrap(), CloseOutcome::NeedsConfirmation);
        assert!(sync.tab("/docs/a.txt").is_some());

        assert_eq!(sync.close("/docs/a.txt", true).unwrap(), CloseOutcome::Closed);
        assert!(sync.tab("/docs/a.txt").is_none());
        assert!(matches!(sync.close("/docs/a.txt", true), Err(ActionError::NotOpen(_))));
    }

    #[test]
    fn test_resolve_close_choices() {
        let (dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.edit_active(|doc| doc.insert_str("new ")).unwrap();

        assert_eq!(
            sync.resolve_close("/docs/a.txt", CloseChoice::Cancel).unwrap(),
            CloseOutcome::Kept
        );
        assert!(sync.tab("/docs/a.txt").unwrap().dirty);

        assert_eq!(
            sync.resolve_close("/docs/a.txt", CloseChoice::SaveAndClose).unwrap(),
            CloseOutcome::Closed
        );
        assert_eq!(fs::read_to_string(dir.path().join("docs/a.txt")).unwrap(), "new alpha");

        sync.open("/docs2/x.txt").unwrap();
        sync.edit_active(|doc| doc.insert_str("lost ")).unwrap();
        sync.resolve_close("/docs2/x.txt", CloseChoice::DiscardAndClose).unwrap();
        assert!(sync.tabs().is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("docs2/x.txt")).unwrap(), "ex");
    }

    #[test]
    fn test_editing_marks_dirty_and_saving_cleans() {
        let (dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        assert!(!sync.has_unsaved_changes());

        // cursor movement alone is not an edit
        sync.edit_active(|doc| doc.move_to_line_end()).unwrap();
        assert!(!sync.has_unsaved_changes());

        sync.edit_active(|doc| doc.insert_char('!')).unwrap();
        assert!(sync.has_unsaved_changes());

        sync.drain_events();
        sync.save_file("/docs/a.txt").unwrap();
        assert!(!sync.has_unsaved_changes());
        assert_eq!(fs::read_to_string(dir.path().join("docs/a.txt")).unwrap(), "alpha!");
        assert_eq!(sync.drain_events(), vec![SyncEvent::Saved("/docs/a.txt".to_string())]);

        sync.edit_active(|doc| doc.backspace()).unwrap();
        assert!(sync.tab("/docs/a.txt").unwrap().dirty);
    }

    #[test]
    fn test_rename_item_updates_disk_tree_and_tab() {
        let (dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();

        let key = sync.rename_item("/docs/a.txt", "c.txt").unwrap();
        assert_eq!(key, "/docs/c.txt");
        assert!(dir.path().join("docs/c.txt").exists());
        assert!(sync.tree.contains("/docs/c.txt"));
        assert_eq!(sync.tree.get("/docs/c.txt").unwrap().title, "c.txt");
        assert_eq!(sync.active_path(), Some("/docs/c.txt"));
        assert_eq!(sync.active().unwrap().title(), "c.txt");
    }

    #[test]
    fn test_rename_item_validation() {
        let (_dir, mut sync) = fixture();
        assert!(matches!(sync.rename_item("/docs/a.txt", ""), Err(ActionError::NoFileName)));
        assert!(matches!(
            sync.rename_item("/docs/a.txt", "a/b.txt"),
            Err(ActionError::InvalidFileName)
        ));
        assert!(matches!(sync.rename_item(ROOT_KEY, "top"), Err(ActionError::RootNode)));
    }

    #[test]
    fn test_refused_rename_leaves_state_alone() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        let before = sync.tree.keys();

        match sync.rename_item("/docs/a.txt", "sub") {
            Err(ActionError::Remote(message)) => assert_eq!(message, "File already exists."),
            other => panic!("expected a remote error, got {:?}", other),
        }
        assert_eq!(sync.tree.keys(), before);
        assert_eq!(tab_paths(&sync), vec!["/docs/a.txt"]);
    }

    #[test]
    fn test_move_item_into_folder_of_target() {
        let (dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();

        let key = sync.move_item("/docs/a.txt", "/docs2/x.txt").unwrap();
        assert_eq!(key, "/docs2/a.txt");
        assert!(dir.path().join("docs2/a.txt").exists());
        assert!(!sync.tree.contains("/docs/a.txt"));
        assert!(sync.tree.contains("/docs2/a.txt"));
        assert_eq!(tab_paths(&sync), vec!["/docs2/a.txt"]);
    }

    #[test]
    fn test_move_into_own_subtree_is_rejected() {
        let (dir, mut sync) = fixture();
        assert!(matches!(
            sync.move_item("/docs", "/docs/sub"),
            Err(ActionError::MoveIntoDescendant)
        ));
        assert!(matches!(
            sync.move_node("/docs", "/docs/sub"),
            Err(ActionError::MoveIntoDescendant)
        ));
        assert!(dir.path().join("docs/sub").is_dir());
        assert!(sync.tree.contains("/docs/sub/b.txt"));
    }

    #[test]
    fn test_delete_item_removes_from_disk() {
        let (dir, mut sync) = fixture();
        sync.open("/docs/sub/b.txt").unwrap();
        sync.delete_item("/docs/sub").unwrap();
        assert!(!dir.path().join("docs/sub").exists());
        assert!(!sync.tree.contains("/docs/sub"));
        assert!(sync.tabs().is_empty());
        assert!(matches!(sync.delete_item(ROOT_KEY), Err(ActionError::RootNode)));
    }

    #[test]
    fn test_add_new_file_opens_it() {
        let (dir, mut sync) = fixture();
        let key = sync.add_new_file("/docs", "new.css").unwrap();
        assert_eq!(key, "/docs/new.css");
        assert!(dir.path().join("docs/new.css").is_file());
        assert!(sync.tree.contains("/docs/new.css"));
        assert_eq!(sync.active_path(), Some("/docs/new.css"));
        assert_eq!(
            sync.active().unwrap().editor.as_ref().unwrap().mode,
            crate::editor::EditorMode::Css
        );

        let top = sync.add_new_file(ROOT_KEY, "top.txt").unwrap();
        assert_eq!(top, "/top.txt");
    }

    #[test]
    fn test_add_new_folder() {
        let (dir, mut sync) = fixture();
        let key = sync.add_new_folder("/docs", "img").unwrap();
        assert_eq!(key, "/docs/img");
        assert!(dir.path().join("docs/img").is_dir());
        assert!(sync.tree.get("/docs/img").unwrap().is_folder);
        assert!(sync.tabs().is_empty());

        match sync.add_new_folder("/docs", "img") {
            Err(ActionError::Remote(message)) => assert_eq!(message, "Folder already exists."),
            other => panic!("expected a remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_upload_replace_reloads_open_editor() {
        let (dir, mut sync) = fixture();
        let upload_dir = TempDir::new().unwrap();
        let source = upload_dir.path().join("b.txt");
        fs::write(&source, "uploaded").unwrap();

        sync.open("/docs/a.txt").unwrap();
        sync.edit_active(|doc| doc.insert_str("unsaved ")).unwrap();

        let key = sync
            .upload_file("/docs", &source, Some("/docs/a.txt"))
            .unwrap();
        assert_eq!(key, "/docs/a.txt");
        assert_eq!(fs::read_to_string(dir.path().join("docs/a.txt")).unwrap(), "uploaded");

        let tab = sync.tab("/docs/a.txt").unwrap();
        assert!(!tab.dirty);
        assert_eq!(tab.editor.as_ref().unwrap().text(), "uploaded");
        assert_eq!(sync.tabs().len(), 1);
    }

    #[test]
    fn test_upload_new_file_adds_and_opens() {
        let (dir, mut sync) = fixture();
        let upload_dir = TempDir::new().unwrap();
        let source = upload_dir.path().join("notes.txt");
        fs::write(&source, "hello").unwrap();

        let key = sync.upload_file("/docs2", &source, None).unwrap();
        assert_eq!(key, "/docs2/notes.txt");
        assert!(dir.path().join("docs2/notes.txt").is_file());
        assert!(sync.tree.contains(&key));
        assert_eq!(sync.active_path(), Some("/docs2/notes.txt"));
    }

    #[test]
    fn test_bad_authenticator_is_a_connector_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        let connector = LocalConnector::new(dir.path()).with_authenticator("secret");
        let mut sync = FileTreeSync::new(connector).with_authenticator("wrong");
        sync.load_tree().unwrap();

        assert!(matches!(
            sync.delete_item("/a.txt"),
            Err(ActionError::Connector(ConnectorError::Unauthorized))
        ));
        assert!(sync.tree.contains("/a.txt"));
    }

    #[test]
    fn test_current_folder_follows_selection_and_renames() {
        let (_dir, mut sync) = fixture();
        assert_eq!(sync.current_folder(), ROOT_KEY);

        assert!(sync.select_node("/docs/sub/b.txt"));
        assert_eq!(sync.current_folder(), "/docs/sub");
        assert_eq!(sync.tree.selected_key(), Some("/docs/sub/b.txt"));

        sync.rename("/docs", "/archive");
        assert_eq!(sync.current_folder(), "/archive/sub");

        sync.delete("/archive");
        assert_eq!(sync.current_folder(), ROOT_KEY);
        assert!(!sync.select_node("/missing"));
    }

    #[test]
    fn test_folder_tree_has_no_files() {
        let (_dir, sync) = fixture();
        let folders = sync.folder_tree().unwrap();
        assert!(folders.contains("/docs/sub"));
        assert!(!folders.contains("/docs/a.txt"));
        assert!(folders.entries.iter().all(|e| e.is_folder));
    }

    #[test]
    fn test_tab_cycling() {
        let (_dir, mut sync) = fixture();
        sync.open("/docs/a.txt").unwrap();
        sync.open("/docs2/x.txt").unwrap();
        sync.next_tab();
        assert_eq!(sync.active_index(), Some(0));
        sync.prev_tab();
        assert_eq!(sync.active_index(), Some(1));
    }

    #[test]
    fn test_download_copies_bytes() {
        let (_dir, sync) = fixture();
        let out = TempDir::new().unwrap();
        let dest = out.path().join("logo-copy.png");

        assert_eq!(sync.download_file("/logo.png", &dest).unwrap(), 4);
        assert_eq!(fs::read(&dest).unwrap(), vec![0x89, b'P', b'N', b'G']);
        assert!(matches!(
            sync.download_file("/docs", &dest),
            Err(ActionError::UnknownPath(_))
        ));
    }

    #[test]
    fn test_folder_listing() {
        let (_dir, sync) = fixture();
        let mut names: Vec<String> = sync
            .folder_listing("/docs")
            .unwrap()
            .into_iter()
            .map(|info| info.filename)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.txt", "sub"]);
        assert!(sync.folder_listing("/docs/a.txt").is_err());
    }
}
