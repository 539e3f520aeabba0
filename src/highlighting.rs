//! Syntax highlighting for the editor modes, backed by syntect.
//!
//! Syntaxes come from syntect's bundled defaults. Extra `.tmTheme` files
//! placed in `~/.config/resedit/themes/` are loaded at startup.

use crate::editor::EditorMode;
use ratatui::style::Color;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Manages syntax highlighting resources
pub struct HighlightingManager {
    pub syntax_set: SyntaxSet,
    pub theme_set: ThemeSet,
    /// Currently active theme name
    pub current_theme: String,
}

impl HighlightingManager {
    pub fn new() -> Self {
        let mut theme_set = ThemeSet::load_defaults();

        if let Some(themes_dir) = dirs::config_dir().map(|p| p.join("resedit").join("themes")) {
            if let Ok(entries) = std::fs::read_dir(&themes_dir) {
                for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
                    if path.extension().map_or(false, |e| e == "tmTheme") {
                        let name = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
                        match (ThemeSet::get_theme(&path), name) {
                            (Ok(theme), Some(name)) => {
                                theme_set.themes.insert(name, theme);
                            }
                            (Err(e), _) => log::warn!("skipping theme {}: {}", path.display(), e),
                            _ => {}
                        }
                    }
                }
            }
        }

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            current_theme: DEFAULT_THEME.to_string(),
        }
    }

    /// Set the current theme by name
    pub fn set_theme(&mut self, name: &str) -> bool {
        if self.theme_set.themes.contains_key(name) {
            self.current_theme = name.to_string();
            true
        } else {
            false
        }
    }

    pub fn current_theme(&self) -> Option<&Theme> {
        self.theme_set.themes.get(&self.current_theme)
    }

    /// Syntax for an editor mode; plain text has none
    pub fn syntax_for_mode(&self, mode: EditorMode) -> Option<&SyntaxReference> {
        if mode == EditorMode::Text {
            return None;
        }
        self.syntax_set
            .find_syntax_by_extension(mode.syntax_extension())
    }

    /// Highlight one line in isolation.
    ///
    /// Returns `None` for plain text or when no syntax/theme is available, in
    /// which case the caller renders the line unstyled.
    pub fn highlight_line(&self, content: &str, mode: EditorMode) -> Option<Vec<StyledSpan>> {
        let syntax = self.syntax_for_mode(mode)?;
        let theme = self.current_theme()?;

        let mut highlighter = HighlightLines::new(syntax, theme);
        let ranges = highlighter.highlight_line(content, &self.syntax_set).ok()?;

        Some(
            ranges
                .into_iter()
                .map(|(style, text)| StyledSpan {
                    text: text.to_string(),
                    style: HighlightStyle {
                        fg: Some(Color::Rgb(
                            style.foreground.r,
                            style.foreground.g,
                            style.foreground.b,
                        )),
                        bold: style.font_style.contains(FontStyle::BOLD),
                        italic: style.font_style.contains(FontStyle::ITALIC),
                    },
                })
                .collect(),
        )
    }
}

impl Default for HighlightingManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A styled span of text for rendering
#[derive(Debug, Clone, Default)]
pub struct StyledSpan {
    pub text: String,
    pub style: HighlightStyle,
}

/// Simplified highlight style for ratatui conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct HighlightStyle {
    pub fg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
}
