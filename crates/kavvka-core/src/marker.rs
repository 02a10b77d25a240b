use std::path::Path;

/// A name is marked when it contains at least one `[` and at least one `]`.
/// Order and balance are not checked.
pub fn is_marked(name: &str) -> bool {
    name.contains('[') && name.contains(']')
}

/// Applies [`is_marked`] to the final component of `path`.
pub fn is_marked_path(path: &Path) -> bool {
    path.file_name()
        .map(|name| is_marked(&name.to_string_lossy()))
        .unwrap_or(false)
}
