use ratatui::style::Color;

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    /// Foreground (text) color
    pub fg: Color,
    /// Background for the sidebar/file tree
    pub sidebar_bg: Color,
    pub editor_bg: Color,
    pub statusbar_bg: Color,
    pub statusbar_fg: Color,
    pub tabbar_bg: Color,
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub tab_inactive_bg: Color,
    pub tab_inactive_fg: Color,
    /// Marker on tabs with unsaved changes
    pub tab_dirty: Color,
    pub border: Color,
    /// Border color for focused pane
    pub border_focused: Color,
    pub line_number: Color,
    pub line_number_current: Color,
    /// Current line highlight
    pub line_highlight: Color,
    pub cursor: Color,
    /// Directory color in file tree
    pub tree_dir: Color,
    pub tree_file: Color,
    /// Selected item in file tree
    pub tree_selected_bg: Color,
    pub dialog_bg: Color,
    pub error: Color,
}

impl Theme {
    /// Look up a built-in color scheme
    pub fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    pub fn dark() -> Self {
        Self {
            fg: Color::Rgb(212, 212, 212),
            sidebar_bg: Color::Rgb(37, 37, 38),
            editor_bg: Color::Rgb(30, 30, 30),
            statusbar_bg: Color::Rgb(0, 122, 204),
            statusbar_fg: Color::Rgb(255, 255, 255),
            tabbar_bg: Color::Rgb(45, 45, 45),
            tab_active_bg: Color::Rgb(30, 30, 30),
            tab_active_fg: Color::Rgb(255, 255, 255),
            tab_inactive_bg: Color::Rgb(45, 45, 45),
            tab_inactive_fg: Color::Rgb(150, 150, 150),
            tab_dirty: Color::Rgb(255, 200, 100),
            border: Color::Rgb(60, 60, 60),
            border_focused: Color::Rgb(0, 122, 204),
            line_number: Color::Rgb(133, 133, 133),
            line_number_current: Color::Rgb(200, 200, 200),
            line_highlight: Color::Rgb(40, 40, 40),
            cursor: Color::Rgb(255, 255, 255),
            tree_dir: Color::Rgb(220, 220, 170),
            tree_file: Color::Rgb(212, 212, 212),
            tree_selected_bg: Color::Rgb(62, 62, 62),
            dialog_bg: Color::Rgb(37, 37, 38),
            error: Color::Rgb(244, 71, 71),
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Rgb(36, 41, 46),
            sidebar_bg: Color::Rgb(243, 243, 243),
            editor_bg: Color::Rgb(255, 255, 255),
            statusbar_bg: Color::Rgb(0, 95, 184),
            statusbar_fg: Color::Rgb(255, 255, 255),
            tabbar_bg: Color::Rgb(236, 236, 236),
            tab_active_bg: Color::Rgb(255, 255, 255),
            tab_active_fg: Color::Rgb(36, 41, 46),
            tab_inactive_bg: Color::Rgb(236, 236, 236),
            tab_inactive_fg: Color::Rgb(110, 110, 110),
            tab_dirty: Color::Rgb(196, 120, 0),
            border: Color::Rgb(210, 210, 210),
            border_focused: Color::Rgb(0, 95, 184),
            line_number: Color::Rgb(150, 150, 150),
            line_number_current: Color::Rgb(36, 41, 46),
            line_highlight: Color::Rgb(245, 245, 240),
            cursor: Color::Rgb(36, 41, 46),
            tree_dir: Color::Rgb(121, 94, 38),
            tree_file: Color::Rgb(36, 41, 46),
            tree_selected_bg: Color::Rgb(218, 228, 240),
            dialog_bg: Color::Rgb(243, 243, 243),
            error: Color::Rgb(205, 49, 49),
        }
    }
}
