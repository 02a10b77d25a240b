use crate::descriptor::Descriptor;
use crate::mover::MoveRecord;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Why an input produced no descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InputFailure {
    NotFound,
    NoMarkedFolder,
    Resolution(String),
    CompareFolderCreate(String),
    Declined,
    Cancelled,
    InvalidDescriptor(String),
}

impl fmt::Display for InputFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFailure::NotFound => f.write_str("path does not exist"),
            InputFailure::NoMarkedFolder => f.write_str("no marked folder found"),
            InputFailure::Resolution(reason) => write!(f, "cannot read directory: {}", reason),
            InputFailure::CompareFolderCreate(reason) => {
                write!(f, "cannot create compare folder: {}", reason)
            }
            InputFailure::Declined => f.write_str("moves declined by operator"),
            InputFailure::Cancelled => f.write_str("batch cancelled"),
            InputFailure::InvalidDescriptor(reason) => write!(f, "invalid descriptor: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InputRecord {
    pub input: String,
    pub chosen_folder: Option<PathBuf>,
    pub compare_folder: Option<PathBuf>,
    pub moves: Vec<MoveRecord>,
    pub descriptor: Option<Descriptor>,
    pub success: bool,
    pub failure: Option<InputFailure>,
}

impl InputRecord {
    pub fn failed(input: &str, failure: InputFailure) -> Self {
        Self {
            input: input.to_string(),
            chosen_folder: None,
            compare_folder: None,
            moves: Vec::new(),
            descriptor: None,
            success: false,
            failure: Some(failure),
        }
    }

    /// A record is successful once its compare folder exists and a
    /// descriptor was produced; failed moves do not change that.
    pub fn completed(
        input: &str,
        chosen_folder: PathBuf,
        compare_folder: PathBuf,
        moves: Vec<MoveRecord>,
        descriptor: Descriptor,
    ) -> Self {
        Self {
            input: input.to_string(),
            chosen_folder: Some(chosen_folder),
            compare_folder: Some(compare_folder),
            moves,
            descriptor: Some(descriptor),
            success: true,
            failure: None,
        }
    }

    pub fn with_chosen_folder(mut self, chosen_folder: PathBuf) -> Self {
        self.chosen_folder = Some(chosen_folder);
        self
    }

    pub fn with_moves(mut self, compare_folder: PathBuf, moves: Vec<MoveRecord>) -> Self {
        self.compare_folder = Some(compare_folder);
        self.moves = moves;
        self
    }

    pub fn moved_count(&self) -> usize {
        self.moves.iter().filter(|m| m.is_moved()).count()
    }

    pub fn failed_move_count(&self) -> usize {
        self.moves.len() - self.moved_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Committed,
    Cancelled,
}

/// Text handed to downstream writers that want plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompanionText {
    /// All descriptors, one per line.
    pub descriptors: String,
    /// Every descriptor split into its two paths, one per line.
    pub paths: String,
    /// The same paths joined with `;`.
    pub joined: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchResult {
    pub state: BatchState,
    pub total: usize,
    pub succeeded: usize,
    pub records: Vec<InputRecord>,
}

impl BatchResult {
    pub fn descriptors(&self) -> Vec<&Descriptor> {
        self.records
            .iter()
            .filter_map(|r| r.descriptor.as_ref())
            .collect()
    }

    pub fn flattened_paths(&self) -> Vec<&str> {
        self.descriptors()
            .into_iter()
            .flat_map(|d| d.paths())
            .collect()
    }

    pub fn companion(&self) -> CompanionText {
        let descriptors = self
            .descriptors()
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let paths = self.flattened_paths();
        CompanionText {
            descriptors,
            paths: paths.join("\n"),
            joined: paths.join(";"),
        }
    }

    pub fn moved_count(&self) -> usize {
        self.records.iter().map(InputRecord::moved_count).sum()
    }

    pub fn failed_move_count(&self) -> usize {
        self.records.iter().map(InputRecord::failed_move_count).sum()
    }

    /// Committed, and every input produced a descriptor.
    pub fn is_full_success(&self) -> bool {
        self.state == BatchState::Committed && self.total > 0 && self.succeeded == self.total
    }
}

/// Collects per-input records in input order.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    records: Vec<InputRecord>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: InputRecord) {
        self.records.push(record);
    }

    pub fn finish(self, state: BatchState) -> BatchResult {
        let succeeded = self.records.iter().filter(|r| r.success).count();
        BatchResult {
            state,
            total: self.records.len(),
            succeeded,
            records: self.records,
        }
    }
}
