use crate::connector::TreeData;
use crate::resource_path;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Key of the root folder
pub const ROOT_KEY: &str = "/";

/// A file or folder in the resource tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Slash-delimited path, unique in the tree
    pub key: String,
    /// Display name
    pub title: String,
    pub is_folder: bool,
    /// Whether the folder's children are shown
    pub expanded: bool,
    /// Ordered children (only folders have any)
    pub children: Vec<Node>,
}

/// A visible row of the tree pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleEntry {
    pub key: String,
    pub title: String,
    pub is_folder: bool,
    pub expanded: bool,
    /// Depth level in the tree (0 = root)
    pub depth: usize,
}

/// The file tree state
#[derive(Debug, Clone)]
pub struct FileTree {
    /// The root folder, key `/`
    root: Node,
    /// All visible entries (flattened for display)
    pub entries: Vec<VisibleEntry>,
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for display
    pub scroll_offset: usize,
}

impl Node {
    pub fn folder(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            is_folder: true,
            expanded: false,
            children: Vec::new(),
        }
    }

    pub fn file(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            is_folder: false,
            expanded: false,
            children: Vec::new(),
        }
    }

    /// Build a node (and its subtree) from serialized tree data
    pub fn from_data(data: TreeData) -> Self {
        Self {
            key: data.key,
            title: data.title,
            is_folder: data.is_folder,
            expanded: data.expand,
            children: data.children.into_iter().map(Node::from_data).collect(),
        }
    }

    /// Find a node in this subtree by key
    pub fn find(&self, key: &str) -> Option<&Node> {
        if self.key == key {
            return Some(self);
        }
        if !resource_path::is_within(key, &self.key) {
            return None;
        }
        self.children.iter().find_map(|child| child.find(key))
    }

    fn find_mut(&mut self, key: &str) -> Option<&mut Node> {
        if self.key == key {
            return Some(self);
        }
        if !resource_path::is_within(key, &self.key) {
            return None;
        }
        self.children.iter_mut().find_map(|child| child.find_mut(key))
    }

    /// Rewrite this node's key and every descendant key from `old` to `new`
    fn rekey(&mut self, old: &str, new: &str) {
        if let Some(key) = resource_path::rebase(&self.key, old, new) {
            self.key = key;
        }
        for child in &mut self.children {
            child.rekey(old, new);
        }
    }

    /// Insert a child keeping folders first, then names case-insensitively
    fn insert_child(&mut self, node: Node) {
        let index = self
            .children
            .iter()
            .position(|c| sibling_order(&node, c) == Ordering::Less)
            .unwrap_or(self.children.len());
        self.children.insert(index, node);
    }

    /// Visit every key of the subtree in pre-order
    fn collect_keys(&self, keys: &mut Vec<String>) {
        keys.push(self.key.clone());
        for child in &self.children {
            child.collect_keys(keys);
        }
    }

    fn expand_all(&mut self) {
        if self.is_folder {
            self.expanded = true;
        }
        for child in &mut self.children {
            child.expand_all();
        }
    }
}

fn sibling_order(a: &Node, b: &Node) -> Ordering {
    match (a.is_folder, b.is_folder) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

impl FileTree {
    /// Create a tree holding only the root folder
    pub fn new() -> Self {
        let mut root = Node::folder(ROOT_KEY, ROOT_KEY);
        root.expanded = true;
        Self::with_root(root)
    }

    /// Build a tree from tree-source data.
    ///
    /// A single `/` entry becomes the root; anything else is hung under a
    /// fresh root.
    pub fn from_data(mut data: Vec<TreeData>) -> Self {
        let mut root = if data.len() == 1 && data[0].key == ROOT_KEY {
            Node::from_data(data.remove(0))
        } else {
            let mut root = Node::folder(ROOT_KEY, ROOT_KEY);
            root.children = data.into_iter().map(Node::from_data).collect();
            root
        };
        root.is_folder = true;
        root.expanded = true;
        Self::with_root(root)
    }

    fn with_root(root: Node) -> Self {
        let mut tree = Self {
            root,
            entries: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        };
        tree.rebuild_entries();
        tree
    }

    /// Replace the content with fresh data, keeping expanded folders and the selection
    pub fn reload(&mut self, data: Vec<TreeData>) {
        let mut expanded = HashSet::new();
        collect_expanded(&self.root, &mut expanded);
        let selected = self.selected_key().map(str::to_string);

        let mut fresh = FileTree::from_data(data);
        restore_expanded(&mut fresh.root, &expanded);
        self.root = fresh.root;
        self.rebuild_entries();

        if let Some(key) = selected {
            self.select_key(&key);
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Get a node by key
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.root.find(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The folder of a node: itself if a folder, otherwise its parent
    pub fn folder_of(&self, key: &str) -> Option<String> {
        let node = self.get(key)?;
        if node.is_folder {
            Some(node.key.clone())
        } else {
            Some(resource_path::parent(&node.key))
        }
    }

    /// Every key in the tree, root first, in display order
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.root.collect_keys(&mut keys);
        keys
    }

    /// Add a node under the folder `parent`.
    ///
    /// Returns false if the parent is missing or already has a child with
    /// the same key.
    pub fn add_child(&mut self, parent: &str, node: Node) -> bool {
        let Some(folder) = self.root.find_mut(parent) else {
            return false;
        };
        if !folder.is_folder || folder.children.iter().any(|c| c.key == node.key) {
            return false;
        }
        folder.expanded = true;
        folder.insert_child(node);
        self.rebuild_entries();
        true
    }

    /// Detach the node at `key` together with its subtree
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let node = self.detach(key)?;
        self.rebuild_entries();
        Some(node)
    }

    fn detach(&mut self, key: &str) -> Option<Node> {
        if key == ROOT_KEY {
            return None;
        }
        let parent = self.root.find_mut(&resource_path::parent(key))?;
        let index = parent.children.iter().position(|c| c.key == key)?;
        Some(parent.children.remove(index))
    }

    /// Give the node at `old` the key `new`, rewriting every descendant key.
    ///
    /// The node is re-inserted in sibling order under the parent of `new`,
    /// which must be an existing folder outside the moved subtree. Returns
    /// false, leaving the tree untouched, when a lookup fails or `new` is
    /// already taken.
    pub fn relocate(&mut self, old: &str, new: &str) -> bool {
        if old == ROOT_KEY || old == new || !self.contains(old) || self.contains(new) {
            return false;
        }
        let new_parent = resource_path::parent(new);
        match self.get(&new_parent) {
            Some(folder) if folder.is_folder => {}
            _ => return false,
        }
        if resource_path::is_within(&new_parent, old) {
            return false;
        }

        let selected = self
            .selected_key()
            .and_then(|key| resource_path::rebase(key, old, new));
        let Some(mut node) = self.detach(old) else {
            return false;
        };
        node.rekey(old, new);
        node.title = resource_path::file_name(new).to_string();
        if let Some(folder) = self.root.find_mut(&new_parent) {
            folder.expanded = true;
            folder.insert_child(node);
        }

        self.rebuild_entries();
        if let Some(index) = selected.and_then(|key| self.entries.iter().position(|e| e.key == key)) {
            self.selected = index;
            self.ensure_visible();
        }
        true
    }

    /// Expand every folder
    pub fn expand_all(&mut self) {
        self.root.expand_all();
        self.rebuild_entries();
    }

    /// Rebuild the flattened list from the current tree state
    fn rebuild_entries(&mut self) {
        let selected = self.selected_key().map(str::to_string);

        let mut entries = Vec::new();
        flatten(&self.root, 0, &mut entries);
        self.entries = entries;

        match selected.and_then(|key| self.entries.iter().position(|e| e.key == key)) {
            Some(index) => self.selected = index,
            None => {
                if self.selected >= self.entries.len() {
                    self.selected = self.entries.len().saturating_sub(1);
                }
            }
        }
    }

    /// Get the currently selected entry
    pub fn selected_entry(&self) -> Option<&VisibleEntry> {
        self.entries.get(self.selected)
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected_entry().map(|e| e.key.as_str())
    }

    /// Select a node by key, expanding its ancestors so it is visible
    pub fn select_key(&mut self, key: &str) -> bool {
        if !self.contains(key) {
            return false;
        }
        let mut ancestor = resource_path::parent(key);
        loop {
            if let Some(node) = self.root.find_mut(&ancestor) {
                node.expanded = true;
            }
            if ancestor == ROOT_KEY {
                break;
            }
            ancestor = resource_path::parent(&ancestor);
        }
        self.rebuild_entries();
        if let Some(index) = self.entries.iter().position(|e| e.key == key) {
            self.selected = index;
            self.ensure_visible();
        }
        true
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.ensure_visible();
        }
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
            self.ensure_visible();
        }
    }

    /// Toggle expand/collapse of the selected folder
    pub fn toggle_expand(&mut self) {
        let Some(key) = self.selected_key().map(str::to_string) else {
            return;
        };
        if key == ROOT_KEY {
            return;
        }
        if let Some(node) = self.root.find_mut(&key) {
            if node.is_folder {
                node.expanded = !node.expanded;
            }
        }
        self.rebuild_entries();
    }

    /// Collapse the selected folder, or jump to the parent of a collapsed one
    pub fn collapse_or_parent(&mut self) {
        let Some(entry) = self.selected_entry() else {
            return;
        };
        if entry.key == ROOT_KEY {
            return;
        }
        if entry.is_folder && entry.expanded {
            self.toggle_expand();
        } else {
            let parent = resource_path::parent(&entry.key);
            self.select_key(&parent);
        }
    }

    /// Ensure the selected item is visible in the viewport
    fn ensure_visible(&mut self) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
    }

    /// Adjust scroll to ensure selected item is visible given viewport height
    pub fn ensure_visible_with_height(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }

        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }

    /// Handle page up
    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        self.ensure_visible();
    }

    /// Handle page down
    pub fn page_down(&mut self, page_size: usize) {
        self.selected = (self.selected + page_size).min(self.entries.len().saturating_sub(1));
        self.ensure_visible();
    }

    /// Go to the first entry
    pub fn go_to_top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    /// Go to the last entry
    pub fn go_to_bottom(&mut self) {
        if !self.entries.is_empty() {
            self.selected = self.entries.len() - 1;
        }
        self.ensure_visible();
    }

    /// Select an entry by index (from mouse click)
    pub fn select_index(&mut self, index: usize) {
        if index < self.entries.len() {
            self.selected = index;
        }
    }

    /// Get the index at a given visual row
    pub fn index_at_row(&self, row: usize) -> Option<usize> {
        let index = self.scroll_offset + row;
        (index < self.entries.len()).then_some(index)
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten a node and its expanded children into the entries list
fn flatten(node: &Node, depth: usize, entries: &mut Vec<VisibleEntry>) {
    entries.push(VisibleEntry {
        key: node.key.clone(),
        title: node.title.clone(),
        is_folder: node.is_folder,
        expanded: node.expanded,
        depth,
    });

    if node.expanded {
        for child in &node.children {
            flatten(child, depth + 1, entries);
        }
    }
}

fn collect_expanded(node: &Node, expanded: &mut HashSet<String>) {
    if node.expanded {
        expanded.insert(node.key.clone());
    }
    for child in &node.children {
        collect_expanded(child, expanded);
    }
}

fn restore_expanded(node: &mut Node, expanded: &HashSet<String>) {
    if expanded.contains(&node.key) {
        node.expanded = true;
    }
    for child in &mut node.children {
        restore_expanded(child, expanded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(key: &str, is_folder: bool, children: Vec<TreeData>) -> TreeData {
        TreeData {
            title: resource_path::file_name(key).to_string(),
            key: key.to_string(),
            is_folder,
            expand: false,
            children,
        }
    }

    fn sample() -> FileTree {
        FileTree::from_data(vec![TreeData {
            title: "/".to_string(),
            key: "/".to_string(),
            is_folder: true,
            expand: true,
            children: vec![
                data(
                    "/docs",
                    true,
                    vec![
                        data("/docs/sub", true, vec![data("/docs/sub/b.txt", false, vec![])]),
                        data("/docs/a.txt", false, vec![]),
                    ],
                ),
                data("/docs2", true, vec![data("/docs2/x.txt", false, vec![])]),
                data("/readme.txt", false, vec![]),
            ],
        }])
    }

    #[test]
    fn test_from_data_shows_root_children() {
        let tree = sample();
        let keys: Vec<&str> = tree.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["/", "/docs", "/docs2", "/readme.txt"]);
        assert_eq!(tree.entries[1].depth, 1);
        assert!(tree.contains("/docs/sub/b.txt"));
    }

    #[test]
    fn test_find_does_not_confuse_siblings() {
        let tree = sample();
        assert!(tree.get("/docs2/x.txt").is_some());
        assert!(tree.get("/docs/x.txt").is_none());
        assert_eq!(tree.folder_of("/docs/a.txt").as_deref(), Some("/docs"));
        assert_eq!(tree.folder_of("/docs/sub").as_deref(), Some("/docs/sub"));
        assert_eq!(tree.folder_of("/readme.txt").as_deref(), Some("/"));
    }

    #[test]
    fn test_add_child_keeps_folders_first() {
        let mut tree = sample();
        assert!(tree.add_child("/docs", Node::file("/docs/0.txt", "0.txt")));
        assert!(tree.add_child("/docs", Node::folder("/docs/zz", "zz")));
        let docs: Vec<&str> = tree
            .get("/docs")
            .unwrap()
            .children
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(docs, vec!["/docs/sub", "/docs/zz", "/docs/0.txt", "/docs/a.txt"]);

        assert!(!tree.add_child("/docs", Node::file("/docs/0.txt", "0.txt")));
        assert!(!tree.add_child("/readme.txt", Node::file("/readme.txt/x", "x")));
        assert!(!tree.add_child("/missing", Node::file("/missing/x", "x")));
    }

    #[test]
    fn test_relocate_in_place_rewrites_descendants() {
        let mut tree = sample();
        assert!(tree.relocate("/docs", "/archive"));
        assert!(tree.contains("/archive/a.txt"));
        assert!(tree.contains("/archive/sub/b.txt"));
        assert!(!tree.contains("/docs"));
        assert!(tree.contains("/docs2/x.txt"));
        assert_eq!(tree.get("/archive").unwrap().title, "archive");
    }

    #[test]
    fn test_relocate_to_other_folder() {
        let mut tree = sample();
        assert!(tree.relocate("/docs/sub", "/docs2/sub"));
        assert!(tree.contains("/docs2/sub/b.txt"));
        assert!(!tree.contains("/docs/sub"));
        assert!(tree.get("/docs2").unwrap().expanded);
    }

    #[test]
    fn test_relocate_refuses_bad_targets() {
        let mut tree = sample();
        assert!(!tree.relocate("/missing", "/elsewhere"));
        assert!(!tree.relocate("/docs", "/docs/sub/docs"));
        assert!(!tree.relocate("/docs/a.txt", "/nowhere/a.txt"));
        assert!(!tree.relocate(ROOT_KEY, "/x"));
        assert!(tree.contains("/docs/a.txt"));
    }

    #[test]
    fn test_relocate_onto_existing_key_is_refused() {
        let mut tree = sample();
        assert!(!tree.relocate("/docs/a.txt", "/docs2/x.txt"));
        assert!(!tree.relocate("/docs", "/docs2"));
        assert!(!tree.relocate("/docs/a.txt", "/docs/a.txt"));
        assert!(tree.contains("/docs/a.txt"));
        assert!(tree.contains("/docs/sub/b.txt"));
        assert_eq!(tree.get("/docs2").unwrap().children.len(), 1);
    }

    #[test]
    fn test_relocate_in_place_keeps_sibling_order() {
        let mut tree = sample();
        assert!(tree.add_child("/docs", Node::file("/docs/b.txt", "b.txt")));
        tree.select_key("/docs/b.txt");

        assert!(tree.relocate("/docs/b.txt", "/docs/0.txt"));
        let docs: Vec<&str> = tree
            .get("/docs")
            .unwrap()
            .children
            .iter()
            .map(|c| c.key.as_str())
            .collect();
        assert_eq!(docs, vec!["/docs/sub", "/docs/0.txt", "/docs/a.txt"]);
        assert_eq!(tree.selected_key(), Some("/docs/0.txt"));
    }

    #[test]
    fn test_remove() {
        let mut tree = sample();
        let removed = tree.remove("/docs").unwrap();
        assert_eq!(removed.children.len(), 2);
        assert!(!tree.contains("/docs/a.txt"));
        assert!(tree.remove(ROOT_KEY).is_none());
        assert!(tree.remove("/docs").is_none());
    }

    #[test]
    fn test_select_key_expands_ancestors() {
        let mut tree = sample();
        assert!(tree.select_key("/docs/sub/b.txt"));
        assert_eq!(tree.selected_key(), Some("/docs/sub/b.txt"));
        assert_eq!(tree.selected_entry().unwrap().depth, 3);

        tree.collapse_or_parent();
        assert_eq!(tree.selected_key(), Some("/docs/sub"));
        tree.collapse_or_parent();
        assert!(!tree.get("/docs/sub").unwrap().expanded);
    }

    #[test]
    fn test_selection_follows_key_across_rebuilds() {
        let mut tree = sample();
        tree.select_key("/readme.txt");
        tree.select_key("/docs/a.txt");
        tree.select_key("/readme.txt");
        assert!(tree.add_child("/", Node::file("/a.txt", "a.txt")));
        assert_eq!(tree.selected_key(), Some("/readme.txt"));
    }

    #[test]
    fn test_reload_keeps_expanded_state() {
        let mut tree = sample();
        tree.select_key("/docs/a.txt");
        tree.reload(vec![to_data(sample().root())]);
        assert!(tree.get("/docs").unwrap().expanded);
        assert_eq!(tree.selected_key(), Some("/docs/a.txt"));
    }

    fn to_data(node: &Node) -> TreeData {
        TreeData {
            title: node.title.clone(),
            key: node.key.clone(),
            is_folder: node.is_folder,
            expand: node.expanded,
            children: node.children.iter().map(to_data).collect(),
        }
    }

    #[test]
    fn test_navigation() {
        let mut tree = sample();
        tree.move_down();
        assert_eq!(tree.selected_key(), Some("/docs"));
        tree.toggle_expand();
        assert_eq!(tree.entries.len(), 6);
        tree.go_to_bottom();
        assert_eq!(tree.selected_key(), Some("/readme.txt"));
        tree.page_up(100);
        assert_eq!(tree.selected, 0);
        assert_eq!(tree.index_at_row(2), Some(2));
        assert_eq!(tree.index_at_row(20), None);
    }
}
