/// Application-level events (commands/actions)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    // App control
    Quit,
    ReloadTree,

    // Focus control
    FocusFileTree,
    FocusEditor,
    CycleFocus,

    // Tabs
    Save,
    CloseTab,
    NextTab,
    PreviousTab,
    GoToTab(u8),

    // Tree actions
    RenameItem,
    DeleteItem,
    NewFile,
    NewFolder,
    Upload,
    /// Upload over the selected file
    ReplaceItem,
    MoveItem,
    /// Save a copy of the selected file to the local disk
    Download,
    ShowInfo,
}
