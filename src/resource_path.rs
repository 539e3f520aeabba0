//! Helpers for the slash-delimited keys used to address resources.
//!
//! Keys always start with `/`; the root folder is `/` itself. Connectors
//! work with normalized (relative) paths and hand keys back with
//! [`normalize_return`].

/// Characters a connector refuses in a file or folder name
const INVALID_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Strip the leading and trailing slash from a path
pub fn normalize(path: &str) -> &str {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.strip_suffix('/').unwrap_or(path)
}

/// Turn a connector path back into a key: leading slash, no trailing slash
pub fn normalize_return(path: &str) -> String {
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Join a parent key and a child name into a key
pub fn join(parent: &str, name: &str) -> String {
    let parent = if parent == "/" { "" } else { parent };
    let path = format!("{}/{}", parent, name);
    if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

/// Parent key of the given key (`/` for top-level entries and the root)
pub fn parent(key: &str) -> String {
    match normalize(key).rsplit_once('/') {
        Some((parent, _)) => normalize_return(parent),
        None => "/".to_string(),
    }
}

/// Last segment of a key
pub fn file_name(key: &str) -> &str {
    let key = normalize(key);
    key.rsplit('/').next().unwrap_or(key)
}

/// Lower-cased extension of the last segment, empty when there is none
pub fn extension(key: &str) -> String {
    let name = file_name(key);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// Whether `key` is `base` or lies beneath it, matching whole segments only
pub fn is_within(key: &str, base: &str) -> bool {
    if base == "/" {
        return key.starts_with('/');
    }
    match key.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Rewrite `key` from under `old` to under `new`.
///
/// Returns `None` when `key` is neither `old` nor one of its descendants.
/// `"/a/bc"` is not a descendant of `"/a/b"`.
pub fn rebase(key: &str, old: &str, new: &str) -> Option<String> {
    if old == "/" || !is_within(key, old) {
        return None;
    }
    Some(format!("{}{}", new, &key[old.len()..]))
}

/// Client-side filename check: word characters, dots, whitespace and dashes
pub fn is_valid_file_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '-' || c.is_whitespace())
}

/// Connector-side filename check: rejects path separators and shell metacharacters
pub fn is_allowed_name(name: &str) -> bool {
    !name.contains(INVALID_NAME_CHARS)
}
