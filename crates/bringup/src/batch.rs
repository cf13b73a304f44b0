//! Batch scheduler - runs the startup action for every selected machine
//!
//! Tasks are independent. In parallel mode each machine gets its own
//! worker; in sequential mode they run one after another on the calling
//! thread. Either way every machine is attempted, a failure never stops
//! its siblings, and results come back in selection order.

use crate::context::{ActionRunner, ProgressCallback};
use crate::error::Result;
use crate::machine::MachineRef;
use crate::types::{ActionKind, Failure, MachineResult, Outcome, Recovery, RunOptions};
use rayon::prelude::*;

/// The machines of one run, bound to that run's options
#[derive(Debug, Clone)]
pub struct Batch {
    options: RunOptions,
    machines: Vec<MachineRef>,
}

impl Batch {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            machines: Vec::new(),
        }
    }

    /// Queue a machine; position in the batch is its selection order
    pub fn add(&mut self, machine: MachineRef) {
        self.machines.push(machine);
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Run every task and return one result per machine, in selection order
    pub fn run<R, P>(self, runner: &R, progress: &mut P) -> Result<Vec<MachineResult>>
    where
        R: ActionRunner + ?Sized,
        P: ProgressCallback + ?Sized,
    {
        if self.machines.is_empty() {
            return Ok(Vec::new());
        }

        progress.on_batch_start(self.machines.len(), self.options.parallel);
        let results = if self.options.parallel && self.machines.len() > 1 {
            self.run_parallel(runner, progress)?
        } else {
            self.run_sequential(runner, progress)
        };
        progress.on_batch_complete();

        Ok(results)
    }

    fn run_sequential<R, P>(&self, runner: &R, progress: &mut P) -> Vec<MachineResult>
    where
        R: ActionRunner + ?Sized,
        P: ProgressCallback + ?Sized,
    {
        let mut results = Vec::with_capacity(self.machines.len());
        for machine in &self.machines {
            progress.on_machine_start(machine);
            let result = run_task(machine, runner, &self.options);
            progress.on_machine_complete(&result);
            results.push(result);
        }
        results
    }

    fn run_parallel<R, P>(&self, runner: &R, progress: &mut P) -> Result<Vec<MachineResult>>
    where
        R: ActionRunner + ?Sized,
        P: ProgressCallback + ?Sized,
    {
        // One worker per machine: startup actions block on the provider,
        // so a smaller pool would serialize them.
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.machines.len())
            .thread_name(|i| format!("bringup-{i}"))
            .build()?;

        // Indexed collect writes each result into the slot at its
        // machine's position, so no lock is needed and order is kept.
        let results: Vec<MachineResult> = pool.install(|| {
            self.machines
                .par_iter()
                .map(|machine| run_task(machine, runner, &self.options))
                .collect()
        });

        // The callback isn't shared with workers; report once the pool drains.
        for result in &results {
            progress.on_machine_complete(result);
        }

        Ok(results)
    }
}

/// Bring up one machine, destroying it on failure if asked to
fn run_task<R>(machine: &MachineRef, runner: &R, options: &RunOptions) -> MachineResult
where
    R: ActionRunner + ?Sized,
{
    log::debug!("Running up for '{}' ({})", machine.name, machine.provider);

    let outcome = match runner.run(machine, ActionKind::Up, options) {
        Ok(()) => {
            log::debug!("'{}' is up", machine.name);
            Outcome::Success
        }
        Err(e) => {
            let error = format!("{e:#}");
            log::debug!("'{}' failed to start: {}", machine.name, error);
            Outcome::Failed(Failure {
                error,
                recovery: recover(machine, runner, options),
            })
        }
    };

    MachineResult::new(machine.clone(), outcome)
}

fn recover<R>(machine: &MachineRef, runner: &R, options: &RunOptions) -> Recovery
where
    R: ActionRunner + ?Sized,
{
    if !options.destroy_on_error {
        return Recovery::Skipped;
    }

    log::debug!("Destroying '{}' after failed startup", machine.name);
    match runner.run(machine, ActionKind::Destroy, options) {
        Ok(()) => Recovery::Destroyed,
        Err(e) => {
            log::warn!("Could not destroy '{}': {:#}", machine.name, e);
            Recovery::DestroyFailed {
                error: format!("{e:#}"),
            }
        }
    }
}
