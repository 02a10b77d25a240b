use crate::config::{AppConfig, CompareRoot, PartitionRoot, SiblingFilter};
use crate::error::Error;
use crate::marker::is_marked_path;
use crate::mover::resolve_target;
use crate::paths::same_location;
use chrono::{DateTime, Local};
use glob::Pattern;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// One intended relocation. `target` is the collision-free name at planning
/// time; the mover checks again before renaming. `blocked` holds the reason
/// when even the timestamped name is taken, so the move is expected to fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub target: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<String>,
}

/// Everything needed to partition one input, computed without touching
/// the filesystem beyond reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionPlan {
    pub input: String,
    pub chosen_folder: PathBuf,
    pub partition_root: PathBuf,
    pub compare_folder: PathBuf,
    pub moves: Vec<PlannedMove>,
}

/// Directory whose children get partitioned for `input`. `input_is_dir`
/// comes from the resolve phase, not from the disk as it is now.
pub fn partition_root_for(input: &Path, input_is_dir: bool, mode: PartitionRoot) -> PathBuf {
    match mode {
        PartitionRoot::InputPath if input_is_dir => input.to_path_buf(),
        PartitionRoot::InputPath | PartitionRoot::InputParent => input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| input.to_path_buf()),
    }
}

pub fn compare_folder_for(chosen: &Path, partition_root: &Path, config: &AppConfig) -> PathBuf {
    let scope = match config.compare_root {
        CompareRoot::MarkedFolder => chosen,
        CompareRoot::PartitionRoot => partition_root,
    };
    scope.join(&config.compare_folder_name)
}

pub fn compile_ignore_patterns(globs: &[String]) -> Vec<Pattern> {
    globs
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                error!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect()
}

/// Directories directly under `root` that should be quarantined.
///
/// Never contains `chosen`, `compare_folder`, anything named like the
/// compare folder, or a directory that holds either of them. With
/// [`SiblingFilter::ExcludeAllMarked`] every marked directory stays too.
pub fn build_exclusion_set(
    root: &Path,
    chosen: &Path,
    compare_folder: &Path,
    filter: SiblingFilter,
    ignore_patterns: &[Pattern],
) -> Result<Vec<PathBuf>, Error> {
    let entries = fs::read_dir(root).map_err(|source| Error::Resolution {
        path: root.to_path_buf(),
        source,
    })?;
    let compare_name = compare_folder.file_name();

    let mut set = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                error!("Error reading entry in directory {}: {}", root.display(), err);
                continue;
            }
        };
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if compare_name.is_some() && path.file_name() == compare_name {
            continue;
        }
        if same_location(&path, chosen) || same_location(&path, compare_folder) {
            info!("Skipping kept folder: {}", path.display());
            continue;
        }
        if chosen.starts_with(&path) || compare_folder.starts_with(&path) {
            info!("Skipping folder containing the kept folder: {}", path.display());
            continue;
        }
        if filter == SiblingFilter::ExcludeAllMarked && is_marked_path(&path) {
            info!("Skipping marked folder: {}", path.display());
            continue;
        }
        if ignore_patterns.iter().any(|p| p.matches_path(&path)) {
            debug!("Ignoring {} (matches ignore pattern)", path.display());
            continue;
        }
        set.push(path);
    }
    set.sort();
    Ok(set)
}

/// Read-only planning stage for one resolved input. Targets are checked
/// against the compare folder as it exists now, using `now` for the
/// collision suffix.
pub fn plan_partition(
    input: &str,
    input_path: &Path,
    input_is_dir: bool,
    chosen: &Path,
    config: &AppConfig,
    ignore_patterns: &[Pattern],
    now: &DateTime<Local>,
) -> Result<PartitionPlan, Error> {
    let partition_root = partition_root_for(input_path, input_is_dir, config.partition_root);
    let compare_folder = compare_folder_for(chosen, &partition_root, config);
    let exclusion = build_exclusion_set(
        &partition_root,
        chosen,
        &compare_folder,
        config.sibling_filter,
        ignore_patterns,
    )?;

    let moves = exclusion
        .into_iter()
        .filter_map(|source| {
            let name = source.file_name()?.to_string_lossy().into_owned();
            let planned = match resolve_target(&compare_folder, &name, now) {
                Ok(target) => PlannedMove {
                    source,
                    target,
                    blocked: None,
                },
                Err((target, reason)) => {
                    debug!("Planned move of {} is blocked: {}", source.display(), reason);
                    PlannedMove {
                        source,
                        target,
                        blocked: Some(reason),
                    }
                }
            };
            Some(planned)
        })
        .collect();

    Ok(PartitionPlan {
        input: input.to_string(),
        chosen_folder: chosen.to_path_buf(),
        partition_root,
        compare_folder,
        moves,
    })
}
