use crate::aggregate::{BatchResult, InputFailure};
use crate::compare_set::PartitionPlan;
use crate::descriptor::Descriptor;
use crate::mover::MoveRecord;
use crate::reconcile::ReconcileStatus;

/// Trait for reporting batch progress.
///
/// The CLI implements it with indicatif and colored output; tests use
/// [`SilentObserver`]. All methods have default no-op implementations.
pub trait PartitionObserver {
    fn on_resolve_start(&self, _total_inputs: usize) {}
    fn on_input_resolved(&self, _input: &str, _candidates: usize) {}
    fn on_input_skipped(&self, _input: &str, _failure: &InputFailure) {}
    fn on_reconcile_complete(&self, _status: ReconcileStatus) {}
    fn on_partition_start(&self, _index: usize, _total: usize, _plan: &PartitionPlan) {}
    fn on_move(&self, _record: &MoveRecord) {}
    fn on_descriptor(&self, _input: &str, _descriptor: &Descriptor) {}
    fn on_batch_complete(&self, _result: &BatchResult) {}
}

/// No-op observer for headless operation.
pub struct SilentObserver;

impl PartitionObserver for SilentObserver {}
