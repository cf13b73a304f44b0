//! Core types for batch startup

use crate::machine::MachineRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of action requested from a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Start (and possibly provision) the machine
    Up,
    /// Tear the machine down
    Destroy,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provisioner settings passed through to the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionOptions {
    /// Force provisioning on or off; `None` leaves it to the provider
    pub enabled: Option<bool>,
    /// Only run these provisioners (by name or type)
    pub types: Option<Vec<String>>,
}

/// Options for one `up` run
///
/// Built once from parsed flags. The provider is the only field that
/// changes afterwards, through [`RunOptions::with_resolved_provider`],
/// and that happens before any machine is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Destroy a machine whose startup failed
    pub destroy_on_error: bool,
    /// Start machines concurrently
    pub parallel: bool,
    /// Provider requested for the whole run
    pub provider: Option<String>,
    /// Run provisioners even if the machine was provisioned before
    pub provision_ignore_sentinel: bool,
    /// Provisioner flags
    pub provision: ProvisionOptions,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            destroy_on_error: true,
            parallel: true,
            provider: None,
            provision_ignore_sentinel: false,
            provision: ProvisionOptions::default(),
        }
    }
}

impl RunOptions {
    /// Finalize the options with the run's effective provider
    pub fn with_resolved_provider(self, provider: Option<String>) -> Self {
        Self { provider, ..self }
    }
}

/// What happened to a machine after its startup failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recovery {
    /// Destroy-on-error was disabled; the machine was left as-is
    Skipped,
    /// The machine was torn down
    Destroyed,
    /// Teardown was attempted and failed too
    DestroyFailed { error: String },
}

/// A startup failure and the recovery that followed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// The original startup error
    pub error: String,
    pub recovery: Recovery,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        match &self.recovery {
            Recovery::Skipped => Ok(()),
            Recovery::Destroyed => write!(f, " (machine destroyed)"),
            Recovery::DestroyFailed { error } => write!(f, " (destroy also failed: {error})"),
        }
    }
}

/// Outcome of a machine's startup action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    Failed(Failure),
}

impl Outcome {
    /// Check if the outcome represents success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Success => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

/// Result of bringing up one machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineResult {
    pub machine: MachineRef,
    pub outcome: Outcome,
    /// Message to show once the machine is up
    pub post_up_message: Option<String>,
}

impl MachineResult {
    pub fn new(machine: MachineRef, outcome: Outcome) -> Self {
        let post_up_message = machine.post_up_message.clone();
        Self {
            machine,
            outcome,
            post_up_message,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Failed machines that were torn down
    pub destroyed: usize,
    /// Failed machines whose teardown failed as well
    pub destroy_failed: usize,
}

impl RunSummary {
    pub fn from_results(results: &[MachineResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            summary.add_result(result);
        }
        summary
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &MachineResult) {
        match &result.outcome {
            Outcome::Success => self.succeeded += 1,
            Outcome::Failed(failure) => {
                self.failed += 1;
                match failure.recovery {
                    Recovery::Skipped => {}
                    Recovery::Destroyed => self.destroyed += 1,
                    Recovery::DestroyFailed { .. } => self.destroy_failed += 1,
                }
            }
        }
    }

    /// Total number of machines processed
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Check if every machine came up
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Process exit status for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(recovery: Recovery) -> Outcome {
        Outcome::Failed(Failure {
            error: "boom".into(),
            recovery,
        })
    }

    #[test]
    fn test_run_options_defaults() {
        let opts = RunOptions::default();
        assert!(opts.destroy_on_error);
        assert!(opts.parallel);
        assert!(!opts.provision_ignore_sentinel);
        assert_eq!(opts.provider, None);
    }

    #[test]
    fn test_with_resolved_provider_keeps_other_fields() {
        let opts = RunOptions {
            parallel: false,
            provider: Some("virtualbox".into()),
            ..Default::default()
        }
        .with_resolved_provider(Some("docker".into()));

        assert_eq!(opts.provider.as_deref(), Some("docker"));
        assert!(!opts.parallel);
        assert!(opts.destroy_on_error);
    }

    #[test]
    fn test_failure_display_keeps_original_error() {
        let failure = Failure {
            error: "boot timed out".into(),
            recovery: Recovery::DestroyFailed {
                error: "vm locked".into(),
            },
        };
        assert_eq!(
            failure.to_string(),
            "boot timed out (destroy also failed: vm locked)"
        );
    }

    #[test]
    fn test_summary_counts_recovery() {
        let machine = MachineRef::new("a", "docker");
        let results = vec![
            MachineResult::new(machine.clone(), Outcome::Success),
            MachineResult::new(machine.clone(), failed(Recovery::Destroyed)),
            MachineResult::new(
                machine.clone(),
                failed(Recovery::DestroyFailed {
                    error: "stuck".into(),
                }),
            ),
            MachineResult::new(machine, failed(Recovery::Skipped)),
        ];

        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.destroyed, 1);
        assert_eq!(summary.destroy_failed, 1);
        assert_eq!(summary.total(), 4);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_exit_status_codes() {
        assert_eq!(ExitStatus::Success.code(), 0);
        assert_ne!(ExitStatus::Failure.code(), 0);
    }
}
