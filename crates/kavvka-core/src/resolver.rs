use crate::error::Error;
use crate::marker::is_marked_path;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Marked directories found for one input. Closest ancestor first, then
/// farther ancestors, then marked children of the search base in directory
/// listing order. Not deduplicated.
pub type CandidateList = Vec<PathBuf>;

/// Build the candidate list for `path`.
///
/// A file searches from its containing directory. The ancestor walk stops
/// before the filesystem root. If the search base cannot be listed the
/// whole resolution fails with [`Error::Resolution`]; the caller treats
/// that as an empty list for this input only.
pub fn resolve(path: &Path) -> Result<CandidateList, Error> {
    let base = if path.is_file() {
        path.parent().unwrap_or(path)
    } else {
        path
    };

    let mut candidates = ancestor_candidates(base);
    let ancestor_count = candidates.len();
    candidates.extend(sibling_candidates(base)?);

    debug!(
        "Resolved {} candidate(s) for {} ({} ancestor, {} child)",
        candidates.len(),
        path.display(),
        ancestor_count,
        candidates.len() - ancestor_count,
    );
    Ok(candidates)
}

fn ancestor_candidates(base: &Path) -> Vec<PathBuf> {
    base.ancestors()
        .take_while(|dir| dir.parent().is_some())
        .filter(|dir| is_marked_path(dir) && dir.exists())
        .map(Path::to_path_buf)
        .collect()
}

fn sibling_candidates(base: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(base).map_err(|source| {
        error!("Cannot read directory {}: {}", base.display(), source);
        Error::Resolution {
            path: base.to_path_buf(),
            source,
        }
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                error!("Error reading entry in directory {}: {}", base.display(), err);
                continue;
            }
        };
        let path = entry.path();
        if path.is_dir() && is_marked_path(&path) {
            found.push(path);
        }
    }
    Ok(found)
}
