use crate::error::Error;
use crate::paths::to_forward_slashes;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

pub const SEPARATOR: char = ';';

/// `"<folder>;<compareFolder>"`, pasted verbatim into the external tool's
/// directory list. Both halves are non-empty and the first one holds no
/// separator, so splitting on the first `;` gives them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    folder: String,
    compare_folder: String,
}

impl Descriptor {
    pub fn new(folder: &str, compare_folder: &str) -> Result<Descriptor, Error> {
        let folder = folder.replace('\\', "/");
        let compare_folder = compare_folder.replace('\\', "/");
        if folder.is_empty() || compare_folder.is_empty() {
            return Err(Error::InvalidDescriptor(
                "descriptor paths must not be empty".to_string(),
            ));
        }
        if folder.contains(SEPARATOR) {
            return Err(Error::InvalidDescriptor(format!(
                "folder path contains '{}': {}",
                SEPARATOR, folder
            )));
        }
        Ok(Descriptor {
            folder,
            compare_folder,
        })
    }

    /// Split on the first separator.
    pub fn parse(s: &str) -> Result<Descriptor, Error> {
        match s.split_once(SEPARATOR) {
            Some((folder, compare_folder)) => Descriptor::new(folder, compare_folder),
            None => Err(Error::InvalidDescriptor(format!(
                "missing '{}' in '{}'",
                SEPARATOR, s
            ))),
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn compare_folder(&self) -> &str {
        &self.compare_folder
    }

    pub fn paths(&self) -> [&str; 2] {
        [&self.folder, &self.compare_folder]
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.folder, SEPARATOR, self.compare_folder)
    }
}

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Build the descriptor for a marked folder and its compare folder.
/// Only slashes are rewritten; brackets are left alone.
pub fn describe(folder: &Path, compare_folder: &Path) -> Result<Descriptor, Error> {
    Descriptor::new(&to_forward_slashes(folder), &to_forward_slashes(compare_folder))
}
