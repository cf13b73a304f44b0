//! Collaborator traits
//!
//! These traits let the orchestrator run without depending on a
//! particular provider implementation, terminal, or progress display.

use crate::machine::MachineRef;
use crate::types::{ActionKind, MachineResult, RunOptions};
use anyhow::Result;

/// Performs provider actions on a single machine
///
/// Implementations are shared across worker threads when a batch runs
/// in parallel, so they must be `Send + Sync`.
pub trait ActionRunner: Send + Sync {
    /// Run `kind` against `machine`
    ///
    /// Returning `Err` marks the machine as failed. For [`ActionKind::Up`]
    /// the scheduler may follow up with [`ActionKind::Destroy`].
    fn run(&self, machine: &MachineRef, kind: ActionKind, options: &RunOptions) -> Result<()>;
}

impl<F> ActionRunner for F
where
    F: Fn(&MachineRef, ActionKind, &RunOptions) -> Result<()> + Send + Sync,
{
    fn run(&self, machine: &MachineRef, kind: ActionKind, options: &RunOptions) -> Result<()> {
        self(machine, kind, options)
    }
}

/// Receives user-facing messages produced during a run
pub trait MessageSink {
    /// Informational line
    fn info(&mut self, msg: &str);

    /// Non-fatal warning
    fn warn(&mut self, msg: &str);

    /// Empty separator line
    fn blank(&mut self);

    /// Success message attributed to a machine
    fn machine_success(&mut self, machine: &str, msg: &str);
}

/// Progress callback for batch execution
pub trait ProgressCallback: Send {
    /// Called once before any task runs
    fn on_batch_start(&mut self, count: usize, parallel: bool);

    /// Called when a machine starts (sequential mode only)
    fn on_machine_start(&mut self, machine: &MachineRef);

    /// Called when a machine's task finishes
    fn on_machine_complete(&mut self, result: &MachineResult);

    /// Called after every task has finished
    fn on_batch_complete(&mut self);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _count: usize, _parallel: bool) {}
    fn on_machine_start(&mut self, _machine: &MachineRef) {}
    fn on_machine_complete(&mut self, _result: &MachineResult) {}
    fn on_batch_complete(&mut self) {}
}

/// Sink that records messages as plain lines
///
/// Warnings are prefixed with `WARNING: ` and machine messages with
/// `<machine>: `, blank lines are kept as empty strings.
#[derive(Debug, Default)]
pub struct Transcript {
    pub lines: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines that were emitted as warnings, without the prefix
    pub fn warnings(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| l.strip_prefix("WARNING: "))
            .collect()
    }
}

impl MessageSink for Transcript {
    fn info(&mut self, msg: &str) {
        self.lines.push(msg.to_string());
    }

    fn warn(&mut self, msg: &str) {
        self.lines.push(format!("WARNING: {msg}"));
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn machine_success(&mut self, machine: &str, msg: &str) {
        self.lines.push(format!("{machine}: {msg}"));
    }
}
