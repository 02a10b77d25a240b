use crate::error::Error;
use crate::marker;
use std::fs;
use std::path::{Path, PathBuf};

/// Canonicalize a raw path string as typed or pasted by an operator:
/// trims whitespace, drops every quote character, turns `\` into `/`.
pub fn normalize_path_str(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .map(|c| if c == '\\' { '/' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Forward-slash rendering of a path. Windows verbatim prefixes
/// (`\\?\`) left behind by canonicalization are dropped.
pub fn to_forward_slashes(path: &Path) -> String {
    let rendered = path.to_string_lossy().replace('\\', "/");
    match rendered.strip_prefix("//?/") {
        Some(stripped) => stripped.to_string(),
        None => rendered,
    }
}

/// A filesystem path with the attributes the resolver cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub is_marked: bool,
}

impl Entry {
    /// Normalize `raw`, make it absolute and inspect it.
    pub fn inspect(raw: &str) -> Result<Entry, Error> {
        let normalized = PathBuf::from(normalize_path_str(raw));
        if !normalized.exists() {
            return Err(Error::NotFound(normalized));
        }
        let path = fs::canonicalize(&normalized)?;
        let is_dir = path.is_dir();
        let is_marked = marker::is_marked_path(&path);
        Ok(Entry {
            path,
            is_dir,
            is_marked,
        })
    }

    /// Directory the resolver starts from: the path itself, or the
    /// containing directory of a file.
    pub fn search_base(&self) -> &Path {
        if self.is_dir {
            &self.path
        } else {
            self.path.parent().unwrap_or(&self.path)
        }
    }
}

/// Same-location test that tolerates paths which no longer exist.
pub fn same_location(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
