//! # Bringup
//!
//! Batch startup orchestration for named machines.
//!
//! Given a registry of machine definitions and the names a user asked
//! for, this crate decides which machines to start, which provider each
//! one runs under, runs the startup action for all of them (in parallel
//! or one at a time), tears down machines that failed, and reports the
//! results.
//!
//! ## Core Concepts
//!
//! - **Provider resolution**: a provider pinned in the project's
//!   `FleetProvider` file overrides `--provider`
//! - **Selection**: explicit names, or every machine with autostart
//!   enabled (unset counts as enabled)
//! - **Batch**: one startup task per machine, results in selection order
//! - **Report**: post-up messages and the exit status
//!
//! ## Example
//!
//! ```ignore
//! use bringup::{
//!     ActionKind, MachineDefinition, MachineRef, MachineRegistry, NoProgress,
//!     NoProviderFile, RunOptions, Transcript, UpRequest, up,
//! };
//!
//! let registry = MachineRegistry::new(vec![MachineDefinition::new("web")]);
//! let runner = |m: &MachineRef, kind: ActionKind, _: &RunOptions| -> anyhow::Result<()> {
//!     println!("{kind} {}", m.name);
//!     Ok(())
//! };
//!
//! let outcome = up(
//!     UpRequest { names: &[], options: RunOptions::default(), registry: &registry },
//!     &runner,
//!     &NoProviderFile,
//!     &mut Transcript::new(),
//!     &mut NoProgress,
//! )?;
//! assert!(outcome.status.is_success());
//! ```
//!
//! ## Collaborator Traits
//!
//! - [`ActionRunner`]: performs the provider's `up` and `destroy` actions
//! - [`ProviderSource`]: supplies the persisted provider
//! - [`MessageSink`]: receives user-facing messages
//! - [`ProgressCallback`]: receives batch progress
//!
//! The crate has no terminal, config-file, or provider code of its own.

pub mod batch;
pub mod context;
pub mod error;
pub mod machine;
pub mod provider;
pub mod report;
pub mod selector;
pub mod types;
pub mod up;

// Re-export main types at crate root
pub use batch::Batch;
pub use context::{ActionRunner, MessageSink, NoProgress, ProgressCallback, Transcript};
pub use error::{Error, Result};
pub use machine::{DEFAULT_PROVIDER, MachineDefinition, MachineRef, MachineRegistry, Provisioner};
pub use provider::{
    NoProviderFile, PROVIDER_FILE, ProviderConflict, ProviderFile, ProviderSource, Resolution,
    resolve, resolve_from,
};
pub use report::{exit_status, report};
pub use selector::{select, validate_provisioner_flags};
pub use types::{
    ActionKind, ExitStatus, Failure, MachineResult, Outcome, ProvisionOptions, Recovery,
    RunOptions, RunSummary,
};
pub use up::{UpOutcome, UpRequest, up};
