use thiserror::Error;

/// Failures reaching or talking to a connector
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid authenticator token")]
    Unauthorized,
    #[error("no such resource: {0}")]
    NotFound(String),
}

impl ConnectorError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            return ConnectorError::NotFound(path.into());
        }
        ConnectorError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Why a user-initiated file manager action did not go through
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Please enter a file name.")]
    NoFileName,
    #[error("Invalid file name. Only letters, digits, spaces, dots, dashes and underscores are allowed.")]
    InvalidFileName,
    #[error("The root folder cannot be renamed, moved or deleted.")]
    RootNode,
    #[error("Cannot move a folder into itself.")]
    MoveIntoDescendant,
    #[error("{0} already exists.")]
    AlreadyExists(String),
    #[error("No such item: {0}")]
    UnknownPath(String),
    #[error("{0} is not open")]
    NotOpen(String),
    #[error("{0} has no editable content")]
    NotEditable(String),
    /// Non-zero response code; the message is shown verbatim
    #[error("{0}")]
    Remote(String),
    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

pub type Result<T, E = ActionError> = std::result::Result<T, E>;
