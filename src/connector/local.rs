use super::{
    ContentSink, ContentSource, FileContent, FileInfo, FileProperties, MutationEndpoint,
    MutationRequest, MutationResponse, Operation, Outcome, TreeData, TreeSource,
};
use crate::error::ConnectorError;
use crate::resource_path;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

const PARENT_NOT_FOUND: &str = "Parent folder not found.";
const INVALID_FOLDER_NAME: &str = "Invalid folder name.";
const FOLDER_EXISTS: &str = "Folder already exists.";
const INVALID_FILE_NAME: &str = "Invalid file name.";
const FILE_EXISTS: &str = "File already exists.";
const FILE_NOT_FOUND: &str = "File not found.";
const FILE_UNREADABLE: &str = "Could not read file.";
const MOVE_INTO_SELF: &str = "Cannot move a folder into itself.";

/// A connector serving a resource directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalConnector {
    /// Directory that `/` maps to
    root: PathBuf,
    /// Token mutations must carry; `None` disables the check
    authenticator: Option<String>,
    /// Extensions served as previews instead of editable text
    image_extensions: Vec<String>,
    /// Whether dot-files show up in listings
    show_hidden: bool,
}

impl LocalConnector {
    /// Create a connector rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            authenticator: None,
            image_extensions: ["png", "gif", "jpg", "jpeg"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            show_hidden: false,
        }
    }

    /// Require mutations to carry this token
    pub fn with_authenticator(mut self, token: impl Into<String>) -> Self {
        self.authenticator = Some(token.into());
        self
    }

    pub fn with_image_extensions(mut self, extensions: Vec<String>) -> Self {
        self.image_extensions = extensions;
        self
    }

    pub fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key or connector path onto the filesystem.
    ///
    /// Returns `None` for paths that try to climb out of the root.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut resolved = self.root.clone();
        for segment in resource_path::normalize(path).split('/') {
            match segment {
                "" | "." => {}
                ".." => return None,
                name => resolved.push(name),
            }
        }
        Some(resolved)
    }

    /// Resolve a path that must name an existing folder
    fn folder(&self, path: &str) -> Option<PathBuf> {
        self.resolve(path).filter(|p| p.is_dir())
    }

    fn is_image(&self, ext: &str) -> bool {
        self.image_extensions.iter().any(|e| e == ext)
    }

    /// Directory listing with folders first, then case-insensitive by name
    fn list(&self, dir: &Path) -> Result<Vec<(String, bool)>, ConnectorError> {
        let read_dir = fs::read_dir(dir).map_err(|e| ConnectorError::io(dir.display().to_string(), e))?;

        let mut entries: Vec<(String, bool)> = read_dir
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                if !self.show_hidden && name.starts_with('.') {
                    return None;
                }
                let is_dir = e.file_type().ok()?.is_dir();
                Some((name, is_dir))
            })
            .collect();

        entries.sort_by(|(a_name, a_dir), (b_name, b_dir)| match (a_dir, b_dir) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => a_name.to_lowercase().cmp(&b_name.to_lowercase()),
        });

        Ok(entries)
    }

    fn tree_children(&self, dir: &Path, key: &str, folders_only: bool) -> Result<Vec<TreeData>, ConnectorError> {
        let mut children = Vec::new();
        for (name, is_dir) in self.list(dir)? {
            let child_key = resource_path::join(key, &name);
            if is_dir {
                let grandchildren = self.tree_children(&dir.join(&name), &child_key, folders_only)?;
                children.push(TreeData {
                    title: name,
                    key: child_key,
                    is_folder: true,
                    expand: false,
                    children: grandchildren,
                });
            } else if !folders_only {
                children.push(TreeData {
                    title: name,
                    key: child_key,
                    is_folder: false,
                    expand: false,
                    children: Vec::new(),
                });
            }
        }
        Ok(children)
    }

    fn add_folder(&self, path: &str, name: &str) -> Result<MutationResponse, ConnectorError> {
        let parent_path = resource_path::normalize(path);
        let outcome = Outcome::Added {
            parent: resource_path::normalize_return(parent_path),
            name: name.to_string(),
        };

        let Some(parent) = self.folder(parent_path) else {
            return Ok(MutationResponse::failed(PARENT_NOT_FOUND, outcome));
        };
        if name.is_empty() || !resource_path::is_allowed_name(name) || name == ".." {
            return Ok(MutationResponse::failed(INVALID_FOLDER_NAME, outcome));
        }
        let target = parent.join(name);
        if target.exists() {
            return Ok(MutationResponse::failed(FOLDER_EXISTS, outcome));
        }

        fs::create_dir(&target).map_err(|e| ConnectorError::io(target.display().to_string(), e))?;
        log::debug!("created folder {}", target.display());
        Ok(MutationResponse::ok(outcome))
    }

    fn add_new(&self, path: &str, name: &str) -> Result<MutationResponse, ConnectorError> {
        let parent_path = resource_path::normalize(path);
        let outcome = Outcome::Added {
            parent: resource_path::normalize_return(parent_path),
            name: name.to_string(),
        };

        let Some(parent) = self.folder(parent_path) else {
            return Ok(MutationResponse::failed(PARENT_NOT_FOUND, outcome));
        };
        if name.is_empty() || !resource_path::is_allowed_name(name) || name == ".." {
            return Ok(MutationResponse::failed(INVALID_FILE_NAME, outcome));
        }
        let target = parent.join(name);
        if target.exists() {
            return Ok(MutationResponse::failed(FILE_EXISTS, outcome));
        }

        fs::write(&target, "").map_err(|e| ConnectorError::io(target.display().to_string(), e))?;
        log::debug!("created file {}", target.display());
        Ok(MutationResponse::ok(outcome))
    }

    fn add(&self, path: &str, source: &Path, replace_path: Option<&str>) -> Result<MutationResponse, ConnectorError> {
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let (parent_path, target_name) = match replace_path {
            Some(replace) => (
                resource_path::normalize(&resource_path::parent(replace)).to_string(),
                resource_path::file_name(replace).to_string(),
            ),
            None => (resource_path::normalize(path).to_string(), name),
        };
        let outcome = Outcome::Added {
            parent: resource_path::normalize_return(&parent_path),
            name: target_name.clone(),
        };

        let Some(parent) = self.folder(&parent_path) else {
            return Ok(MutationResponse::failed(PARENT_NOT_FOUND, outcome));
        };
        if target_name.is_empty() || !resource_path::is_allowed_name(&target_name) {
            return Ok(MutationResponse::failed(INVALID_FILE_NAME, outcome));
        }
        let target = parent.join(&target_name);
        if target.exists() && replace_path.is_none() {
            return Ok(MutationResponse::failed(FILE_EXISTS, outcome));
        }

        let data = match fs::read(source) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("cannot read upload {}: {}", source.display(), e);
                return Ok(MutationResponse::failed(FILE_UNREADABLE, outcome));
            }
        };
        fs::write(&target, data).map_err(|e| ConnectorError::io(target.display().to_string(), e))?;
        log::debug!("uploaded {} to {}", source.display(), target.display());
        Ok(MutationResponse::ok(outcome))
    }

    fn rename(&self, path: &str, new_name: &str) -> Result<MutationResponse, ConnectorError> {
        let npath = resource_path::normalize(path);
        let (parent_path, old_name) = npath.rsplit_once('/').unwrap_or(("", npath));
        let outcome = Outcome::Renamed {
            old_parent: resource_path::normalize_return(parent_path),
            old_name: old_name.to_string(),
            new_parent: resource_path::normalize_return(parent_path),
            new_name: new_name.to_string(),
        };

        let Some(parent) = self.folder(parent_path) else {
            return Ok(MutationResponse::failed(PARENT_NOT_FOUND, outcome));
        };
        if new_name == old_name {
            return Ok(MutationResponse::ok(outcome));
        }
        if new_name.is_empty() || !resource_path::is_allowed_name(new_name) || new_name == ".." {
            return Ok(MutationResponse::failed(INVALID_FILE_NAME, outcome));
        }
        let source = parent.join(old_name);
        if old_name.is_empty() || !source.exists() {
            return Ok(MutationResponse::failed(FILE_NOT_FOUND, outcome));
        }
        let target = parent.join(new_name);
        if target.exists() {
            return Ok(MutationResponse::failed(FILE_EXISTS, outcome));
        }

        fs::rename(&source, &target).map_err(|e| ConnectorError::io(source.display().to_string(), e))?;
        log::debug!("renamed {} to {}", source.display(), target.display());
        Ok(MutationResponse::ok(outcome))
    }

    fn delete(&self, path: &str) -> Result<MutationResponse, ConnectorError> {
        let npath = resource_path::normalize(path);
        let (parent_path, name) = npath.rsplit_once('/').unwrap_or(("", npath));
        let outcome = Outcome::Deleted {
            path: resource_path::normalize_return(path),
        };

        let Some(parent) = self.folder(parent_path) else {
            return Ok(MutationResponse::failed(PARENT_NOT_FOUND, outcome));
        };
        let target = parent.join(name);
        if name.is_empty() || !target.exists() {
            return Ok(MutationResponse::failed(FILE_NOT_FOUND, outcome));
        }

        let removed = if target.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        removed.map_err(|e| ConnectorError::io(target.display().to_string(), e))?;
        log::debug!("deleted {}", target.display());
        Ok(MutationResponse::ok(outcome))
    }

    fn move_to(&self, path: &str, directory: &str) -> Result<MutationResponse, ConnectorError> {
        let npath = resource_path::normalize(path);
        let new_parent_path = resource_path::normalize(directory);
        let (parent_path, filename) = npath.rsplit_once('/').unwrap_or(("", npath));
        let outcome = Outcome::Moved {
            new_path: resource_path::normalize_return(&format!("{}/{}", new_parent_path, filename)),
        };

        let (Some(parent), Some(target_dir)) = (self.folder(parent_path), self.folder(new_parent_path)) else {
            return Ok(MutationResponse::failed(PARENT_NOT_FOUND, outcome));
        };
        let source = parent.join(filename);
        if filename.is_empty() || !source.exists() {
            return Ok(MutationResponse::failed(FILE_NOT_FOUND, outcome));
        }
        if resource_path::is_within(
            &resource_path::normalize_return(new_parent_path),
            &resource_path::normalize_return(npath),
        ) {
            return Ok(MutationResponse::failed(MOVE_INTO_SELF, outcome));
        }
        let target = target_dir.join(filename);
        if target.exists() {
            return Ok(MutationResponse::failed(FILE_EXISTS, outcome));
        }

        fs::rename(&source, &target).map_err(|e| ConnectorError::io(source.display().to_string(), e))?;
        log::debug!("moved {} to {}", source.display(), target.display());
        Ok(MutationResponse::ok(outcome))
    }
}

/// Human readable size in whole kilobytes, or megabytes from 1024kb up
fn format_size(bytes: u64) -> String {
    let kb = bytes / 1024;
    if kb < 1024 {
        format!("{}kb", kb)
    } else {
        format!("{}mb", kb / 1024)
    }
}

impl ContentSource for LocalConnector {
    fn get_file(&self, path: &str) -> Result<FileContent, ConnectorError> {
        let ext = resource_path::extension(path);
        if self.is_image(&ext) {
            let info = self.get_info(path)?;
            return Ok(FileContent::Preview { ext, info });
        }

        let file = self
            .resolve(path)
            .ok_or_else(|| ConnectorError::NotFound(path.to_string()))?;
        let contents = fs::read_to_string(&file).map_err(|e| ConnectorError::io(path, e))?;
        Ok(FileContent::Text { ext, contents })
    }

    fn get_info(&self, path: &str) -> Result<FileInfo, ConnectorError> {
        let target = self
            .resolve(path)
            .ok_or_else(|| ConnectorError::NotFound(path.to_string()))?;
        let metadata = fs::metadata(&target).map_err(|e| ConnectorError::io(path, e))?;

        let npath = resource_path::normalize(path);
        let filename = resource_path::file_name(npath).to_string();
        let date_modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());

        let (file_type, size) = if metadata.is_dir() {
            ("dir".to_string(), None)
        } else {
            (resource_path::extension(npath), Some(format_size(metadata.len())))
        };

        Ok(FileInfo {
            path: resource_path::normalize_return(npath),
            filename,
            file_type,
            properties: FileProperties { date_modified, size },
            error: String::new(),
            code: 0,
        })
    }

    fn get_folder(&self, path: &str) -> Result<Vec<FileInfo>, ConnectorError> {
        let dir = self
            .folder(path)
            .ok_or_else(|| ConnectorError::NotFound(path.to_string()))?;
        let key = resource_path::normalize_return(resource_path::normalize(path));

        self.list(&dir)?
            .into_iter()
            .map(|(name, _)| self.get_info(&resource_path::join(&key, &name)))
            .collect()
    }

    fn download(&self, path: &str) -> Result<Vec<u8>, ConnectorError> {
        let file = self
            .resolve(path)
            .ok_or_else(|| ConnectorError::NotFound(path.to_string()))?;
        fs::read(&file).map_err(|e| ConnectorError::io(path, e))
    }
}

impl ContentSink for LocalConnector {
    fn save_file(&mut self, path: &str, value: &str) -> Result<(), ConnectorError> {
        let file = self
            .resolve(path)
            .ok_or_else(|| ConnectorError::NotFound(path.to_string()))?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|e| ConnectorError::io(path, e))?;
        }
        fs::write(&file, value.replace("\r\n", "\n")).map_err(|e| ConnectorError::io(path, e))?;
        log::debug!("saved {}", file.display());
        Ok(())
    }
}

impl MutationEndpoint for LocalConnector {
    fn submit(&mut self, request: &MutationRequest) -> Result<MutationResponse, ConnectorError> {
        if let Some(expected) = &self.authenticator {
            if *expected != request.authenticator {
                log::warn!("rejected {} request with a bad authenticator", request.operation.mode());
                return Err(ConnectorError::Unauthorized);
            }
        }

        let response = match &request.operation {
            Operation::Rename { path, new_name } => self.rename(path, new_name),
            Operation::Move { path, directory } => self.move_to(path, directory),
            Operation::Delete { path } => self.delete(path),
            Operation::AddNew { path, name } => self.add_new(path, name),
            Operation::AddFolder { path, name } => self.add_folder(path, name),
            Operation::Add {
                path,
                source,
                replace_path,
            } => self.add(path, source, replace_path.as_deref()),
        }?;

        if !response.is_ok() {
            log::info!("{} refused: {}", request.operation.mode(), response.error);
        }
        Ok(response)
    }
}

impl TreeSource for LocalConnector {
    fn file_tree(&self, folders_only: bool) -> Result<Vec<TreeData>, ConnectorError> {
        let children = self.tree_children(&self.root, "/", folders_only)?;
        Ok(vec![TreeData {
            title: "/".to_string(),
            key: "/".to_string(),
            is_folder: true,
            expand: true,
            children,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, LocalConnector) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
        fs::write(dir.path().join("docs/a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("docs/sub/b.txt"), "beta").unwrap();
        fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        let connector = LocalConnector::new(dir.path());
        (dir, connector)
    }

    fn submit(connector: &mut LocalConnector, operation: Operation) -> MutationResponse {
        connector
            .submit(&MutationRequest::new(operation, ""))
            .unwrap()
    }

    #[test]
    fn test_file_tree_orders_folders_first() {
        let (_dir, connector) = fixture();
        let tree = connector.file_tree(false).unwrap();
        assert_eq!(tree.len(), 1);
        let root = &tree[0];
        assert_eq!(root.key, "/");
        assert!(root.expand);

        let keys: Vec<&str> = root.children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["/docs", "/logo.png"]);

        let docs = &root.children[0];
        let keys: Vec<&str> = docs.children.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["/docs/sub", "/docs/a.txt"]);
        assert_eq!(docs.children[0].children[0].key, "/docs/sub/b.txt");
    }

    #[test]
    fn test_file_tree_folders_only() {
        let (_dir, connector) = fixture();
        let tree = connector.file_tree(true).unwrap();
        let docs = &tree[0].children[0];
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(docs.children.len(), 1);
        assert_eq!(docs.children[0].key, "/docs/sub");
        assert!(docs.children[0].children.is_empty());
    }

    #[test]
    fn test_get_file_text_and_preview() {
        let (_dir, connector) = fixture();
        match connector.get_file("/docs/a.txt").unwrap() {
            FileContent::Text { ext, contents } => {
                assert_eq!(ext, "txt");
                assert_eq!(contents, "alpha");
            }
            other => panic!("expected text, got {:?}", other),
        }
        match connector.get_file("/logo.png").unwrap() {
            FileContent::Preview { ext, info } => {
                assert_eq!(ext, "png");
                assert_eq!(info.filename, "logo.png");
                assert_eq!(info.properties.size.as_deref(), Some("0kb"));
            }
            other => panic!("expected preview, got {:?}", other),
        }
        assert!(matches!(
            connector.get_file("/missing.txt"),
            Err(ConnectorError::NotFound(_))
        ));
    }

    #[test]
    fn test_get_folder_and_info() {
        let (_dir, connector) = fixture();
        let infos = connector.get_folder("/docs/").unwrap();
        let paths: Vec<&str> = infos.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["/docs/sub", "/docs/a.txt"]);
        assert!(infos[0].is_dir());
        assert_eq!(infos[1].file_type, "txt");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "0kb");
        assert_eq!(format_size(4096), "4kb");
        assert_eq!(format_size(3 * 1024 * 1024), "3mb");
    }

    #[test]
    fn test_resolve_refuses_parent_segments() {
        let (_dir, connector) = fixture();
        assert!(connector.resolve("/../etc/passwd").is_none());
        assert!(connector.get_file("/docs/../../x").is_err());
    }

    #[test]
    fn test_add_folder_and_new_file() {
        let (dir, mut connector) = fixture();

        let response = submit(
            &mut connector,
            Operation::AddFolder {
                path: "/docs".to_string(),
                name: "css".to_string(),
            },
        );
        assert!(response.is_ok());
        assert_eq!(
            response.outcome,
            Outcome::Added {
                parent: "/docs".to_string(),
                name: "css".to_string()
            }
        );
        assert!(dir.path().join("docs/css").is_dir());

        let again = submit(
            &mut connector,
            Operation::AddFolder {
                path: "/docs".to_string(),
                name: "css".to_string(),
            },
        );
        assert_eq!(again.error, FOLDER_EXISTS);

        let response = submit(
            &mut connector,
            Operation::AddNew {
                path: "/".to_string(),
                name: "new.css".to_string(),
            },
        );
        assert!(response.is_ok());
        assert_eq!(fs::read_to_string(dir.path().join("new.css")).unwrap(), "");

        let invalid = submit(
            &mut connector,
            Operation::AddNew {
                path: "/".to_string(),
                name: "a:b".to_string(),
            },
        );
        assert_eq!(invalid.code, 1);
        assert_eq!(invalid.error, INVALID_FILE_NAME);

        let orphan = submit(
            &mut connector,
            Operation::AddNew {
                path: "/nowhere".to_string(),
                name: "x.txt".to_string(),
            },
        );
        assert_eq!(orphan.error, PARENT_NOT_FOUND);
    }

    #[test]
    fn test_rename() {
        let (dir, mut connector) = fixture();
        let response = submit(
            &mut connector,
            Operation::Rename {
                path: "/docs/a.txt".to_string(),
                new_name: "c.txt".to_string(),
            },
        );
        assert!(response.is_ok());
        assert_eq!(
            response.outcome,
            Outcome::Renamed {
                old_parent: "/docs".to_string(),
                old_name: "a.txt".to_string(),
                new_parent: "/docs".to_string(),
                new_name: "c.txt".to_string(),
            }
        );
        assert!(dir.path().join("docs/c.txt").exists());
        assert!(!dir.path().join("docs/a.txt").exists());

        let clash = submit(
            &mut connector,
            Operation::Rename {
                path: "/docs/c.txt".to_string(),
                new_name: "sub".to_string(),
            },
        );
        assert_eq!(clash.error, FILE_EXISTS);

        let same = submit(
            &mut connector,
            Operation::Rename {
                path: "/docs/c.txt".to_string(),
                new_name: "c.txt".to_string(),
            },
        );
        assert!(same.is_ok());
    }

    #[test]
    fn test_delete() {
        let (dir, mut connector) = fixture();
        let response = submit(
            &mut connector,
            Operation::Delete {
                path: "/docs".to_string(),
            },
        );
        assert!(response.is_ok());
        assert!(!dir.path().join("docs").exists());

        let missing = submit(
            &mut connector,
            Operation::Delete {
                path: "/docs".to_string(),
            },
        );
        assert_eq!(missing.error, FILE_NOT_FOUND);
    }

    #[test]
    fn test_move() {
        let (dir, mut connector) = fixture();
        let response = submit(
            &mut connector,
            Operation::Move {
                path: "/docs/a.txt".to_string(),
                directory: "/docs/sub".to_string(),
            },
        );
        assert!(response.is_ok());
        assert_eq!(
            response.outcome,
            Outcome::Moved {
                new_path: "/docs/sub/a.txt".to_string()
            }
        );
        assert!(dir.path().join("docs/sub/a.txt").exists());

        let into_self = submit(
            &mut connector,
            Operation::Move {
                path: "/docs".to_string(),
                directory: "/docs/sub".to_string(),
            },
        );
        assert_eq!(into_self.error, MOVE_INTO_SELF);

        let to_root = submit(
            &mut connector,
            Operation::Move {
                path: "/docs/sub/b.txt".to_string(),
                directory: "/".to_string(),
            },
        );
        assert!(to_root.is_ok());
        assert_eq!(
            to_root.outcome,
            Outcome::Moved {
                new_path: "/b.txt".to_string()
            }
        );
    }

    #[test]
    fn test_upload_and_replace() {
        let (dir, mut connector) = fixture();
        let upload_dir = TempDir::new().unwrap();
        let source = upload_dir.path().join("style.css");
        fs::write(&source, "body {}").unwrap();

        let response = submit(
            &mut connector,
            Operation::Add {
                path: "/docs".to_string(),
                source: source.clone(),
                replace_path: None,
            },
        );
        assert!(response.is_ok());
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/style.css")).unwrap(),
            "body {}"
        );

        let duplicate = submit(
            &mut connector,
            Operation::Add {
                path: "/docs".to_string(),
                source: source.clone(),
                replace_path: None,
            },
        );
        assert_eq!(duplicate.error, FILE_EXISTS);

        let replaced = submit(
            &mut connector,
            Operation::Add {
                path: "/".to_string(),
                source,
                replace_path: Some("/docs/a.txt".to_string()),
            },
        );
        assert!(replaced.is_ok());
        assert_eq!(
            replaced.outcome,
            Outcome::Added {
                parent: "/docs".to_string(),
                name: "a.txt".to_string()
            }
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/a.txt")).unwrap(),
            "body {}"
        );
    }

    #[test]
    fn test_authenticator_is_checked() {
        let (_dir, connector) = fixture();
        let mut connector = connector.with_authenticator("secret");
        let operation = Operation::Delete {
            path: "/docs/a.txt".to_string(),
        };

        let denied = connector.submit(&MutationRequest::new(operation.clone(), "wrong"));
        assert!(matches!(denied, Err(ConnectorError::Unauthorized)));

        let allowed = connector
            .submit(&MutationRequest::new(operation, "secret"))
            .unwrap();
        assert!(allowed.is_ok());
    }

    #[test]
    fn test_save_file_normalizes_line_endings() {
        let (dir, mut connector) = fixture();
        connector.save_file("/docs/a.txt", "one\r\ntwo\r\n").unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("docs/a.txt")).unwrap(),
            "one\ntwo\n"
        );
        assert_eq!(connector.download("/docs/a.txt").unwrap(), b"one\ntwo\n");
    }
}
