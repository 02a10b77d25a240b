use crate::aggregate::{BatchResult, BatchState, InputFailure, InputRecord, ResultAggregator};
use crate::compare_set::{self, PartitionPlan};
use crate::config::AppConfig;
use crate::descriptor::describe;
use crate::error::Error;
use crate::mover;
use crate::operator::Operator;
use crate::paths::Entry;
use crate::progress::PartitionObserver;
use crate::reconcile::{Command, ReconcileState, ReconcileStatus, SelectionMap, COMMAND_HELP};
use crate::resolver::{self, CandidateList};
use chrono::Local;
use glob::Pattern;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of the resolve phase for one input. The entry keeps what the
/// input was (file or directory) when it was resolved.
#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub input: String,
    pub outcome: Result<(Entry, CandidateList), InputFailure>,
}

/// Result of a dry run: what `run` would do, with nothing touched.
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub state: BatchState,
    pub plans: Vec<PartitionPlan>,
    pub skipped: Vec<(String, InputFailure)>,
}

pub struct PartitionEngine {
    config: AppConfig,
    ignore_patterns: Vec<Pattern>,
}

impl PartitionEngine {
    pub fn new(config: AppConfig) -> Self {
        let ignore_patterns = compare_set::compile_ignore_patterns(&config.ignore_patterns);
        Self {
            config,
            ignore_patterns,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the full partition pipeline:
    /// 1. Resolve candidate marked folders for every input
    /// 2. Reconcile selections with the operator (may cancel everything)
    /// 3. Per input: plan, confirm, create compare folder, move, describe
    ///
    /// Inputs are processed strictly one after another, so only one mover
    /// ever works on a compare folder at a time. A failure in one input
    /// never affects the others.
    pub fn run(
        &self,
        inputs: &[String],
        operator: &mut dyn Operator,
        observer: &dyn PartitionObserver,
    ) -> Result<BatchResult, Error> {
        let start = Instant::now();
        let resolved = self.resolve_inputs(inputs, observer);
        let selections = self.reconcile(&resolved, operator, observer)?;

        let mut aggregator = ResultAggregator::new();
        let state = match selections {
            None => {
                info!("Batch cancelled, nothing was moved");
                for item in &resolved {
                    aggregator.push(InputRecord::failed(
                        &item.input,
                        item.outcome.clone().err().unwrap_or(InputFailure::Cancelled),
                    ));
                }
                BatchState::Cancelled
            }
            Some(selections) => {
                if selections.is_empty() {
                    info!("No input has a marked folder, nothing to partition");
                }
                let total = selections.len();
                let mut chosen = selections.into_iter();
                let mut index = 0;
                for item in &resolved {
                    let record = match &item.outcome {
                        Err(failure) => InputRecord::failed(&item.input, failure.clone()),
                        Ok((entry, _)) => match chosen.next() {
                            Some(selection) => {
                                index += 1;
                                self.process_input(
                                    index,
                                    total,
                                    &item.input,
                                    entry,
                                    selection.folder,
                                    operator,
                                    observer,
                                )
                            }
                            None => InputRecord::failed(&item.input, InputFailure::Cancelled),
                        },
                    };
                    aggregator.push(record);
                }
                BatchState::Committed
            }
        };

        let result = aggregator.finish(state);
        info!(
            "All processing complete: {}/{} succeeded, {} folder(s) moved, {} move failure(s) in {:.2}s",
            result.succeeded,
            result.total,
            result.moved_count(),
            result.failed_move_count(),
            start.elapsed().as_secs_f64(),
        );
        observer.on_batch_complete(&result);
        Ok(result)
    }

    /// Resolve and reconcile like [`run`](Self::run), then stop after
    /// planning. Nothing on disk is created or moved.
    pub fn plan(
        &self,
        inputs: &[String],
        operator: &mut dyn Operator,
        observer: &dyn PartitionObserver,
    ) -> Result<PlanReport, Error> {
        let resolved = self.resolve_inputs(inputs, observer);
        let selections = self.reconcile(&resolved, operator, observer)?;

        let mut skipped: Vec<(String, InputFailure)> = resolved
            .iter()
            .filter_map(|item| match &item.outcome {
                Err(failure) => Some((item.input.clone(), failure.clone())),
                Ok(_) => None,
            })
            .collect();

        let Some(selections) = selections else {
            return Ok(PlanReport {
                state: BatchState::Cancelled,
                plans: Vec::new(),
                skipped,
            });
        };

        let now = Local::now();
        let mut plans = Vec::new();
        let mut chosen = selections.into_iter();
        for item in &resolved {
            let Ok((entry, _)) = &item.outcome else {
                continue;
            };
            let Some(selection) = chosen.next() else {
                break;
            };
            match compare_set::plan_partition(
                &item.input,
                &entry.path,
                entry.is_dir,
                &selection.folder,
                &self.config,
                &self.ignore_patterns,
                &now,
            ) {
                Ok(plan) => plans.push(plan),
                Err(err) => {
                    warn!("Cannot plan {}: {}", item.input, err);
                    skipped.push((item.input.clone(), InputFailure::Resolution(err.to_string())));
                }
            }
        }

        Ok(PlanReport {
            state: BatchState::Committed,
            plans,
            skipped,
        })
    }

    /// Normalize every input and collect its candidate list. Failures are
    /// recorded per input and never stop the batch.
    pub fn resolve_inputs(
        &self,
        inputs: &[String],
        observer: &dyn PartitionObserver,
    ) -> Vec<ResolvedInput> {
        observer.on_resolve_start(inputs.len());

        inputs
            .iter()
            .map(|input| {
                let outcome = resolve_one(input);
                match &outcome {
                    Ok((_, candidates)) => {
                        debug!("Candidates for {}: {:?}", input, candidates);
                        observer.on_input_resolved(input, candidates.len());
                    }
                    Err(failure) => {
                        warn!("Skipping {}: {}", input, failure);
                        observer.on_input_skipped(input, failure);
                    }
                }
                ResolvedInput {
                    input: input.clone(),
                    outcome,
                }
            })
            .collect()
    }

    /// Drive the reconciliation state machine with `operator`. `Ok(None)`
    /// means the operator cancelled.
    pub fn reconcile(
        &self,
        resolved: &[ResolvedInput],
        operator: &mut dyn Operator,
        observer: &dyn PartitionObserver,
    ) -> Result<Option<SelectionMap>, Error> {
        let pending = resolved
            .iter()
            .filter_map(|item| match &item.outcome {
                Ok((_, candidates)) => Some((item.input.clone(), candidates.clone())),
                Err(_) => None,
            })
            .collect();

        let mut state = ReconcileState::new(pending);
        if state.inputs().is_empty() {
            state = state.apply_command(Command::Commit).0;
        }

        while !state.is_finished() {
            let view = format!("{}\n{}", state.render(), COMMAND_HELP);
            let (next, message) = match operator.next_command(&view)? {
                Some(line) => state.apply(&line),
                None => state.apply_command(Command::Cancel),
            };
            operator.notify(&message);
            state = next;
        }

        let status = state.status();
        observer.on_reconcile_complete(status);
        if status == ReconcileStatus::Cancelled {
            return Ok(None);
        }
        Ok(state.into_selections())
    }

    #[allow(clippy::too_many_arguments)]
    fn process_input(
        &self,
        index: usize,
        total: usize,
        input: &str,
        entry: &Entry,
        chosen: PathBuf,
        operator: &mut dyn Operator,
        observer: &dyn PartitionObserver,
    ) -> InputRecord {
        info!("=== Processing path {}/{} ===", index, total);
        info!("Path: {}", input);
        info!("Marked folder: {}", chosen.display());

        // An earlier input may have moved this one into its compare folder.
        if fs::symlink_metadata(&entry.path).is_err() {
            warn!("Skipping {}: no longer exists at {}", input, entry.path.display());
            return InputRecord::failed(input, InputFailure::NotFound).with_chosen_folder(chosen);
        }

        let now = Local::now();
        let plan = match compare_set::plan_partition(
            input,
            &entry.path,
            entry.is_dir,
            &chosen,
            &self.config,
            &self.ignore_patterns,
            &now,
        ) {
            Ok(plan) => plan,
            Err(err) => {
                warn!("Cannot partition {}: {}", input, err);
                return InputRecord::failed(input, InputFailure::Resolution(err.to_string()))
                    .with_chosen_folder(chosen);
            }
        };
        observer.on_partition_start(index, total, &plan);

        if self.config.confirm_moves() && !plan.moves.is_empty() {
            let confirmed = operator.confirm_moves(&plan).unwrap_or_else(|err| {
                warn!("Confirmation failed for {}: {}", input, err);
                false
            });
            if !confirmed {
                info!("Moves declined for {}", input);
                return InputRecord::failed(input, InputFailure::Declined).with_chosen_folder(chosen);
            }
        }

        let moves = match mover::apply_partition(&plan, &now, observer) {
            Ok(moves) => moves,
            Err(err) => {
                warn!("{}", err);
                return InputRecord::failed(input, InputFailure::CompareFolderCreate(err.to_string()))
                    .with_chosen_folder(chosen);
            }
        };

        match describe(&plan.chosen_folder, &plan.compare_folder) {
            Ok(descriptor) => {
                info!("Descriptor: {}", descriptor);
                observer.on_descriptor(input, &descriptor);
                InputRecord::completed(input, chosen, plan.compare_folder, moves, descriptor)
            }
            Err(err) => {
                warn!("{}", err);
                InputRecord::failed(input, InputFailure::InvalidDescriptor(err.to_string()))
                    .with_chosen_folder(chosen)
                    .with_moves(plan.compare_folder, moves)
            }
        }
    }
}

fn resolve_one(input: &str) -> Result<(Entry, CandidateList), InputFailure> {
    let entry = match Entry::inspect(input) {
        Ok(entry) => entry,
        Err(Error::NotFound(_)) => return Err(InputFailure::NotFound),
        Err(err) => return Err(InputFailure::Resolution(err.to_string())),
    };

    debug!(
        "Inspected {} (dir: {}, marked: {})",
        entry.path.display(),
        entry.is_dir,
        entry.is_marked
    );
    match resolver::resolve(entry.search_base()) {
        Ok(candidates) if candidates.is_empty() => Err(InputFailure::NoMarkedFolder),
        Ok(candidates) => Ok((entry, candidates)),
        Err(err) => Err(InputFailure::Resolution(err.to_string())),
    }
}
