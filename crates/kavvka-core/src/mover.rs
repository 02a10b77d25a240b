use crate::compare_set::PartitionPlan;
use crate::error::Error;
use crate::progress::PartitionObserver;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const COLLISION_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum MoveOutcome {
    Moved,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub source: PathBuf,
    pub target: PathBuf,
    pub outcome: MoveOutcome,
}

impl MoveRecord {
    pub fn is_moved(&self) -> bool {
        self.outcome == MoveOutcome::Moved
    }
}

/// Create the compare folder. An existing directory is fine.
pub fn create_compare_folder(path: &Path) -> Result<(), Error> {
    match fs::create_dir(path) {
        Ok(()) => {
            info!("Created compare folder: {}", path.display());
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => {
            info!("Using existing compare folder: {}", path.display());
            Ok(())
        }
        Err(source) => Err(Error::CompareFolderCreate {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Pick a free target for `name` inside `compare_folder`. A taken name gets
/// `_<YYYYmmddHHMMSS>` appended once; if that is taken too the move fails.
pub fn resolve_target(
    compare_folder: &Path,
    name: &str,
    now: &DateTime<Local>,
) -> Result<PathBuf, (PathBuf, String)> {
    let target = compare_folder.join(name);
    if !exists(&target) {
        return Ok(target);
    }

    let stamped = compare_folder.join(format!(
        "{}_{}",
        name,
        now.format(COLLISION_TIMESTAMP_FORMAT)
    ));
    if exists(&stamped) {
        let reason = format!("target already exists: {}", stamped.display());
        return Err((stamped, reason));
    }
    Ok(stamped)
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Relocate one directory into `compare_folder` with a single rename. Any
/// OS error leaves the source where it was.
pub fn move_folder(source: &Path, compare_folder: &Path, now: &DateTime<Local>) -> MoveRecord {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let target = match resolve_target(compare_folder, &name, now) {
        Ok(target) => target,
        Err((target, reason)) => {
            error!("Cannot move {}: {}", source.display(), reason);
            return MoveRecord {
                source: source.to_path_buf(),
                target,
                outcome: MoveOutcome::Failed(reason),
            };
        }
    };

    match fs::rename(source, &target) {
        Ok(()) => {
            info!("Moved folder: {} -> {}", source.display(), target.display());
            MoveRecord {
                source: source.to_path_buf(),
                target,
                outcome: MoveOutcome::Moved,
            }
        }
        Err(err) => {
            error!("Error moving folder {}: {}", source.display(), err);
            MoveRecord {
                source: source.to_path_buf(),
                target,
                outcome: MoveOutcome::Failed(err.to_string()),
            }
        }
    }
}

/// Apply stage: create the compare folder, then move every planned source
/// one after another. Only a compare-folder failure is an error; failed
/// moves are recorded and the rest continue.
pub fn apply_partition(
    plan: &PartitionPlan,
    now: &DateTime<Local>,
    observer: &dyn PartitionObserver,
) -> Result<Vec<MoveRecord>, Error> {
    create_compare_folder(&plan.compare_folder)?;

    let records: Vec<MoveRecord> = plan
        .moves
        .iter()
        .map(|planned| {
            let record = move_folder(&planned.source, &plan.compare_folder, now);
            observer.on_move(&record);
            record
        })
        .collect();

    let moved = records.iter().filter(|r| r.is_moved()).count();
    info!(
        "Moved {}/{} folder(s) into {}",
        moved,
        records.len(),
        plan.compare_folder.display()
    );
    Ok(records)
}
