use crate::compare_set::PartitionPlan;
use std::collections::VecDeque;
use std::io;

/// The human (or script) on the other end of reconciliation and move
/// confirmation.
pub trait Operator {
    /// Next reconciliation command after showing `view`. `Ok(None)` means
    /// the input is exhausted, which cancels the batch.
    fn next_command(&mut self, view: &str) -> io::Result<Option<String>>;

    /// Asked before any folder is moved for one input, unless forced.
    fn confirm_moves(&mut self, plan: &PartitionPlan) -> io::Result<bool>;

    /// Diagnostic or acknowledgement for the last command.
    fn notify(&mut self, _message: &str) {}
}

/// Accepts the default selections and every plan.
#[derive(Debug, Default)]
pub struct AutoOperator;

impl Operator for AutoOperator {
    fn next_command(&mut self, _view: &str) -> io::Result<Option<String>> {
        Ok(Some(String::new()))
    }

    fn confirm_moves(&mut self, _plan: &PartitionPlan) -> io::Result<bool> {
        Ok(true)
    }
}

/// Replays fixed commands, then commits.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    commands: VecDeque<String>,
    confirm: bool,
    commit_when_done: bool,
    messages: Vec<String>,
}

impl ScriptedOperator {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
            confirm: true,
            commit_when_done: true,
            messages: Vec::new(),
        }
    }

    pub fn with_confirmation(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    /// Behave like a closed stdin once the script runs out.
    pub fn ending_with_eof(mut self) -> Self {
        self.commit_when_done = false;
        self
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

impl Operator for ScriptedOperator {
    fn next_command(&mut self, _view: &str) -> io::Result<Option<String>> {
        match self.commands.pop_front() {
            Some(command) => Ok(Some(command)),
            None if self.commit_when_done => Ok(Some(String::new())),
            None => Ok(None),
        }
    }

    fn confirm_moves(&mut self, _plan: &PartitionPlan) -> io::Result<bool> {
        Ok(self.confirm)
    }

    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
