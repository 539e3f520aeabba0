use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub file_tree: FileTreeConfig,
    #[serde(default)]
    pub connector: ConnectorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Tab width in spaces
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
    /// Use spaces instead of tabs
    #[serde(default = "default_true")]
    pub insert_spaces: bool,
    #[serde(default = "default_true")]
    pub show_line_numbers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Sidebar width percentage
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width: u16,
    /// Syntax highlighting theme name
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Interface colors: `dark` or `light`
    #[serde(default = "default_color_scheme")]
    pub color_scheme: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileTreeConfig {
    /// Show hidden files
    #[serde(default)]
    pub show_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Extensions opened as a preview instead of in an editor
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
    /// CSRF token required for mutations (empty = none)
    #[serde(default)]
    pub authenticator: String,
}

// Default value helpers
fn default_tab_width() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_sidebar_width() -> u16 {
    25
}
fn default_theme() -> String {
    "base16-ocean.dark".to_string()
}
fn default_color_scheme() -> String {
    "dark".to_string()
}
fn default_image_extensions() -> Vec<String> {
    ["png", "gif", "jpg", "jpeg"].iter().map(|e| e.to_string()).collect()
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            insert_spaces: true,
            show_line_numbers: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_width: default_sidebar_width(),
            theme: default_theme(),
            color_scheme: default_color_scheme(),
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
            authenticator: String::new(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file location
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                log::warn!("ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("resedit").join("config.toml"))
    }

    /// Save configuration to the default config file location
    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(self)?;
            std::fs::write(path, content)?;
        }
        Ok(())
    }
}
