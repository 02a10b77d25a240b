//! Batch-wide confirmation of marked-folder selections.
//!
//! The session is a pure state machine: [`ReconcileState::apply`] takes one
//! textual command and returns the next state plus a message for the
//! operator. Front ends only feed lines in and render [`ReconcileState::render`].

use crate::paths::to_forward_slashes;
use crate::resolver::CandidateList;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CANCEL_TOKEN: &str = "q";

pub const COMMAND_HELP: &str = "Enter '<path no> <folder no>' to change a selection (e.g. '1 2'), \
press Enter to confirm all, or 'q' to cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileStatus {
    Reconciling,
    Committed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// 1-based input index, 1-based candidate index.
    Select { input: usize, candidate: usize },
    Commit,
    Cancel,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Invalid command '{0}', expected '<path no> <folder no>'")]
    Malformed(String),

    #[error("Invalid path number {index}, expected 1..={len}")]
    InputOutOfRange { index: usize, len: usize },

    #[error("Invalid folder number {index} for path {input}, expected 1..={len}")]
    CandidateOutOfRange {
        input: usize,
        index: usize,
        len: usize,
    },

    #[error("Selections are already final")]
    Finished,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(Command::Commit);
        }
        if trimmed.eq_ignore_ascii_case(CANCEL_TOKEN) {
            return Ok(Command::Cancel);
        }

        let malformed = || CommandError::Malformed(trimmed.to_string());
        let mut parts = trimmed.split_whitespace();
        let input = parts.next().and_then(|p| p.parse::<usize>().ok());
        let candidate = parts.next().and_then(|p| p.parse::<usize>().ok());
        match (input, candidate, parts.next()) {
            (Some(input), Some(candidate), None) => Ok(Command::Select { input, candidate }),
            _ => Err(malformed()),
        }
    }
}

/// One input still in scope for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInput {
    pub input: String,
    pub candidates: CandidateList,
    selected: usize,
}

impl PendingInput {
    pub fn selected(&self) -> &Path {
        &self.candidates[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }
}

/// Chosen marked folder for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub input: String,
    pub folder: PathBuf,
    pub candidates: CandidateList,
}

/// Frozen input → marked folder mapping, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionMap {
    selections: Vec<Selection>,
}

impl SelectionMap {
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl IntoIterator for SelectionMap {
    type Item = Selection;
    type IntoIter = std::vec::IntoIter<Selection>;

    fn into_iter(self) -> Self::IntoIter {
        self.selections.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileState {
    inputs: Vec<PendingInput>,
    status: ReconcileStatus,
}

impl ReconcileState {
    /// Start a session. Inputs with an empty candidate list are dropped;
    /// every remaining input defaults to its first candidate.
    pub fn new(resolved: Vec<(String, CandidateList)>) -> Self {
        let inputs = resolved
            .into_iter()
            .filter(|(_, candidates)| !candidates.is_empty())
            .map(|(input, candidates)| PendingInput {
                input,
                candidates,
                selected: 0,
            })
            .collect();
        Self {
            inputs,
            status: ReconcileStatus::Reconciling,
        }
    }

    pub fn status(&self) -> ReconcileStatus {
        self.status
    }

    pub fn inputs(&self) -> &[PendingInput] {
        &self.inputs
    }

    pub fn is_finished(&self) -> bool {
        self.status != ReconcileStatus::Reconciling
    }

    /// Apply one operator command. Invalid commands leave the selections
    /// untouched and report a diagnostic.
    pub fn apply(self, line: &str) -> (Self, String) {
        match Command::parse(line) {
            Ok(command) => self.apply_command(command),
            Err(err) => (self, format!("❌ {}", err)),
        }
    }

    pub fn apply_command(mut self, command: Command) -> (Self, String) {
        if self.is_finished() {
            return (self, format!("❌ {}", CommandError::Finished));
        }

        match command {
            Command::Commit => {
                self.status = ReconcileStatus::Committed;
                let message = format!("✅ Confirmed {} selection(s)", self.inputs.len());
                (self, message)
            }
            Command::Cancel => {
                self.status = ReconcileStatus::Cancelled;
                (self, "Cancelled by operator".to_string())
            }
            Command::Select { input, candidate } => match self.select(input, candidate) {
                Ok(message) => (self, message),
                Err(err) => (self, format!("❌ {}", err)),
            },
        }
    }

    fn select(&mut self, input: usize, candidate: usize) -> Result<String, CommandError> {
        let len = self.inputs.len();
        if input == 0 || input > len {
            return Err(CommandError::InputOutOfRange { index: input, len });
        }
        let pending = &mut self.inputs[input - 1];
        let count = pending.candidates.len();
        if candidate == 0 || candidate > count {
            return Err(CommandError::CandidateOutOfRange {
                input,
                index: candidate,
                len: count,
            });
        }
        pending.selected = candidate - 1;
        Ok(format!(
            "✅ Updated: {} -> {}",
            pending.input,
            to_forward_slashes(pending.selected())
        ))
    }

    /// The frozen selections, available only once committed.
    pub fn into_selections(self) -> Option<SelectionMap> {
        if self.status != ReconcileStatus::Committed {
            return None;
        }
        let selections = self
            .inputs
            .into_iter()
            .map(|pending| Selection {
                folder: pending.candidates[pending.selected].clone(),
                input: pending.input,
                candidates: pending.candidates,
            })
            .collect();
        Some(SelectionMap { selections })
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Current paths and their marked folders:\n");
        for (i, pending) in self.inputs.iter().enumerate() {
            let _ = writeln!(out, "\n{}. Path: {}", i + 1, pending.input);
            let _ = writeln!(out, "   Selected: {}", to_forward_slashes(pending.selected()));
            let _ = writeln!(out, "   Candidates:");
            for (j, candidate) in pending.candidates.iter().enumerate() {
                let marker = if j == pending.selected { ">" } else { " " };
                let _ = writeln!(
                    out,
                    "    {} {}. {}",
                    marker,
                    j + 1,
                    to_forward_slashes(candidate)
                );
            }
        }
        out
    }
}
