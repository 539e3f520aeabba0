/// Editing mode of a document, chosen from its file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    Css,
    Javascript,
    Html,
    Xml,
    #[default]
    Text,
}

impl EditorMode {
    /// Mode for a lower- or mixed-case extension without the dot
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "css" => EditorMode::Css,
            "js" => EditorMode::Javascript,
            "htm" | "html" => EditorMode::Html,
            "xml" => EditorMode::Xml,
            _ => EditorMode::Text,
        }
    }

    /// Name shown in the status bar
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorMode::Css => "CSS",
            EditorMode::Javascript => "JavaScript",
            EditorMode::Html => "HTML",
            EditorMode::Xml => "XML",
            EditorMode::Text => "Plain Text",
        }
    }

    /// Extension syntect knows the matching syntax by
    pub fn syntax_extension(&self) -> &'static str {
        match self {
            EditorMode::Css => "css",
            EditorMode::Javascript => "js",
            EditorMode::Html => "html",
            EditorMode::Xml => "xml",
            EditorMode::Text => "txt",
        }
    }
}
