use super::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Maps keyboard events to application events, whichever pane has focus
pub fn map_key_event(key: KeyEvent) -> Option<AppEvent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('q') if ctrl => Some(AppEvent::Quit),
        KeyCode::Char('r') if ctrl => Some(AppEvent::ReloadTree),
        KeyCode::F(5) => Some(AppEvent::ReloadTree),

        KeyCode::Char('s') if ctrl => Some(AppEvent::Save),
        KeyCode::Char('w') if ctrl => Some(AppEvent::CloseTab),
        KeyCode::Char('n') if ctrl => Some(AppEvent::NewFile),
        KeyCode::PageDown if ctrl => Some(AppEvent::NextTab),
        KeyCode::PageUp if ctrl => Some(AppEvent::PreviousTab),

        // Alt+1-9, Alt+0 for the last tab
        KeyCode::Char(c @ '0'..='9') if alt => c.to_digit(10).map(|d| AppEvent::GoToTab(d as u8)),

        KeyCode::F(2) => Some(AppEvent::FocusEditor),
        KeyCode::F(3) => Some(AppEvent::FocusFileTree),
        KeyCode::BackTab => Some(AppEvent::CycleFocus),

        _ => None,
    }
}

/// Single-key actions available while the tree has focus
pub fn map_tree_key(key: KeyEvent) -> Option<AppEvent> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        KeyCode::Char('r') => Some(AppEvent::RenameItem),
        KeyCode::Char('d') | KeyCode::Delete => Some(AppEvent::DeleteItem),
        KeyCode::Char('n') => Some(AppEvent::NewFile),
        KeyCode::Char('N') => Some(AppEvent::NewFolder),
        KeyCode::Char('u') => Some(AppEvent::Upload),
        KeyCode::Char('U') => Some(AppEvent::ReplaceItem),
        KeyCode::Char('m') => Some(AppEvent::MoveItem),
        KeyCode::Char('D') => Some(AppEvent::Download),
        KeyCode::Char('i') => Some(AppEvent::ShowInfo),
        KeyCode::Tab => Some(AppEvent::CycleFocus),
        _ => None,
    }
}
