use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use kavvka_core::compare_set::PartitionPlan;
use kavvka_core::mover::{MoveOutcome, MoveRecord};
use kavvka_core::paths::to_forward_slashes;
use kavvka_core::reconcile::ReconcileStatus;
use kavvka_core::{BatchResult, Descriptor, InputFailure, PartitionObserver};
use std::sync::Mutex;

const PANEL_WIDTH: usize = 80;

/// CLI progress reporter using an indicatif bar over the inputs.
///
/// The bar is only drawn when nothing will prompt during the partition
/// phase; otherwise status lines are printed plainly.
pub struct CliReporter {
    show_bar: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new(show_bar: bool) -> Self {
        Self {
            show_bar,
            bar: Mutex::new(None),
        }
    }

    fn print_line(&self, line: String) {
        let guard = self.bar.lock().unwrap();
        match guard.as_ref() {
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    fn finish_bar(&self) {
        let mut guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.take() {
            pb.finish_and_clear();
        }
    }
}

impl PartitionObserver for CliReporter {
    fn on_resolve_start(&self, total_inputs: usize) {
        eprintln!("🚀 Resolving marked folders for {} path(s)...", total_inputs);
    }

    fn on_input_skipped(&self, input: &str, failure: &InputFailure) {
        eprintln!("  {} {}: {}", "⚠".yellow(), input, failure.to_string().yellow());
    }

    fn on_reconcile_complete(&self, status: ReconcileStatus) {
        if status == ReconcileStatus::Cancelled {
            eprintln!("  {} Cancelled, nothing was moved", "✗".red());
        }
    }

    fn on_partition_start(&self, index: usize, total: usize, plan: &PartitionPlan) {
        if self.show_bar {
            let mut guard = self.bar.lock().unwrap();
            let pb = guard.get_or_insert_with(|| {
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::with_template(
                        "  {spinner:.cyan} Partitioning [{bar:30.cyan/dim}] {pos}/{len} {msg}",
                    )
                    .unwrap()
                    .progress_chars("━╸─")
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
                );
                pb
            });
            pb.set_position(index.saturating_sub(1) as u64);
            pb.set_message(plan.input.clone());
        } else {
            println!(
                "\n=== {}/{} {} ===",
                index,
                total,
                to_forward_slashes(&plan.chosen_folder).cyan()
            );
        }
    }

    fn on_move(&self, record: &MoveRecord) {
        let line = match &record.outcome {
            MoveOutcome::Moved => format!(
                "  {} {} -> {}",
                "✓".green(),
                to_forward_slashes(&record.source),
                to_forward_slashes(&record.target)
            ),
            MoveOutcome::Failed(reason) => format!(
                "  {} {}: {}",
                "✗".red(),
                to_forward_slashes(&record.source),
                reason.red()
            ),
        };
        self.print_line(line);
    }

    fn on_descriptor(&self, _input: &str, descriptor: &Descriptor) {
        let rule = "=".repeat(PANEL_WIDTH);
        self.print_line(format!(
            "\n{}\n{}\n{}\n{}\n{}\n",
            rule,
            "Descriptor (paste into the comparison tool's included directories)".bold(),
            rule,
            descriptor.to_string().cyan(),
            rule
        ));
        let guard = self.bar.lock().unwrap();
        if let Some(pb) = guard.as_ref() {
            pb.inc(1);
        }
    }

    fn on_batch_complete(&self, result: &BatchResult) {
        self.finish_bar();
        eprintln!(
            "  {} {}/{} path(s) succeeded, {} folder(s) moved, {} move failure(s)",
            if result.is_full_success() {
                "✓".green()
            } else {
                "✗".red()
            },
            result.succeeded,
            result.total,
            result.moved_count(),
            result.failed_move_count()
        );
    }
}
