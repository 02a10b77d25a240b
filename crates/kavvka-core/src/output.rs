//! Writers for the secondary outputs of a batch. A failed write never
//! undoes moves that already happened.

use crate::aggregate::{BatchResult, BatchState, CompanionText, InputRecord};
use crate::error::Error;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    state: BatchState,
    total: usize,
    succeeded: usize,
    moved: usize,
    failed_moves: usize,
    records: &'a [InputRecord],
    companion: CompanionText,
}

fn write_file(path: &Path, contents: &str) -> Result<(), Error> {
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, contents).map_err(write_err)?;
    info!("Saved to: {}", path.display());
    Ok(())
}

/// Every descriptor on its own line.
pub fn write_descriptors(path: &Path, result: &BatchResult) -> Result<(), Error> {
    write_file(path, &result.companion().descriptors)
}

/// Counts, terminal state, per-input records and the companion block as
/// pretty JSON.
pub fn write_report(path: &Path, result: &BatchResult) -> Result<(), Error> {
    let report = BatchReport {
        state: result.state,
        total: result.total,
        succeeded: result.succeeded,
        moved: result.moved_count(),
        failed_moves: result.failed_move_count(),
        records: &result.records,
        companion: result.companion(),
    };
    write_file(path, &serde_json::to_string_pretty(&report)?)
}

pub fn write_companion(path: &Path, result: &BatchResult) -> Result<(), Error> {
    write_file(path, &serde_json::to_string_pretty(&result.companion())?)
}
