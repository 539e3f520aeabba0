//! Contracts between the file manager and the store holding the resources.
//!
//! The file manager never touches storage itself. It reads content through
//! [`ContentSource`], writes edits through [`ContentSink`], requests
//! structural changes through [`MutationEndpoint`] and populates its tree
//! from a [`TreeSource`]. Wire types serialize to the JSON shapes the
//! resource editor connector speaks (camelCase keys, `mode` tags).

mod local;

pub use local::LocalConnector;

use crate::error::ConnectorError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A structural change to the resource directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Operation {
    /// Rename the item at `path`, keeping it in the same folder
    Rename {
        #[serde(rename = "old")]
        path: String,
        #[serde(rename = "new")]
        new_name: String,
    },
    /// Move the item at `path` into the folder `directory`
    Move { path: String, directory: String },
    Delete { path: String },
    /// Create an empty file `name` inside folder `path`
    AddNew { path: String, name: String },
    /// Create a folder `name` inside folder `path`
    AddFolder { path: String, name: String },
    /// Upload a local file into folder `path`, or over `replace_path`
    Add {
        #[serde(rename = "currentpath")]
        path: String,
        #[serde(rename = "newfile")]
        source: PathBuf,
        #[serde(rename = "replacepath", default, skip_serializing_if = "Option::is_none")]
        replace_path: Option<String>,
    },
}

impl Operation {
    /// The connector mode name for this operation
    pub fn mode(&self) -> &'static str {
        match self {
            Operation::Rename { .. } => "rename",
            Operation::Move { .. } => "move",
            Operation::Delete { .. } => "delete",
            Operation::AddNew { .. } => "addnew",
            Operation::AddFolder { .. } => "addfolder",
            Operation::Add { .. } => "add",
        }
    }
}

/// An operation together with the CSRF token guarding it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRequest {
    #[serde(flatten)]
    pub operation: Operation,
    #[serde(rename = "_authenticator", default)]
    pub authenticator: String,
}

impl MutationRequest {
    pub fn new(operation: Operation, authenticator: impl Into<String>) -> Self {
        Self {
            operation,
            authenticator: authenticator.into(),
        }
    }
}

/// Connector reply to a [`MutationRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// 0 on success; anything else means `error` holds a user-facing message
    pub code: i32,
    #[serde(default)]
    pub error: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl MutationResponse {
    pub fn ok(outcome: Outcome) -> Self {
        Self {
            code: 0,
            error: String::new(),
            outcome,
        }
    }

    pub fn failed(error: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            code: 1,
            error: error.into(),
            outcome,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// Operation-specific part of a response.
///
/// Variant order matters for decoding: an upload reply carries `parent`,
/// `path` and `name`, and must be read as `Added`, not `Deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum Outcome {
    Renamed {
        old_parent: String,
        old_name: String,
        new_parent: String,
        new_name: String,
    },
    Added {
        parent: String,
        name: String,
    },
    Moved {
        new_path: String,
    },
    Deleted {
        path: String,
    },
}

/// Size, dates and type of a single resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub path: String,
    pub filename: String,
    /// `dir` for folders, otherwise the lower-cased extension
    pub file_type: String,
    pub properties: FileProperties,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub code: i32,
}

impl FileInfo {
    pub fn is_dir(&self) -> bool {
        self.file_type == "dir"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProperties {
    /// Seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<u64>,
    /// Human readable size such as `12kb`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

/// What the content source hands back for a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    /// Editable text
    Text { ext: String, contents: String },
    /// Binary content (images); only its info is shown
    Preview { ext: String, info: FileInfo },
}

impl FileContent {
    pub fn ext(&self) -> &str {
        match self {
            FileContent::Text { ext, .. } | FileContent::Preview { ext, .. } => ext,
        }
    }
}

/// One node of the serialized hierarchy used to populate a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeData {
    pub title: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_folder: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expand: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeData>,
}

/// Reads resources
pub trait ContentSource {
    /// Content of a file plus its extension
    fn get_file(&self, path: &str) -> Result<FileContent, ConnectorError>;
    fn get_info(&self, path: &str) -> Result<FileInfo, ConnectorError>;
    /// Infos for the direct children of a folder, folders first
    fn get_folder(&self, path: &str) -> Result<Vec<FileInfo>, ConnectorError>;
    /// Raw bytes of a file
    fn download(&self, path: &str) -> Result<Vec<u8>, ConnectorError>;
}

/// Persists editor content
pub trait ContentSink {
    fn save_file(&mut self, path: &str, value: &str) -> Result<(), ConnectorError>;
}

/// Applies structural changes
pub trait MutationEndpoint {
    /// Transport failures are `Err`; refused operations come back with a
    /// non-zero `code`.
    fn submit(&mut self, request: &MutationRequest) -> Result<MutationResponse, ConnectorError>;
}

/// Provides the serialized hierarchy for initial population
pub trait TreeSource {
    fn file_tree(&self, folders_only: bool) -> Result<Vec<TreeData>, ConnectorError>;
}

/// Everything the file manager needs from one backend
pub trait Connector: ContentSource + ContentSink + MutationEndpoint + TreeSource {}

impl<T> Connector for T where T: ContentSource + ContentSink + MutationEndpoint + TreeSource {}
