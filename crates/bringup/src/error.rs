//! Error types for the bringup crate

use thiserror::Error;

/// Errors that stop a run before any machine is started
#[derive(Error, Debug)]
pub enum Error {
    /// A machine named on the command line is not in the registry
    #[error("machine '{name}' is not defined (known machines: {})", known.join(", "))]
    UnknownMachine { name: String, known: Vec<String> },

    /// A `--provision-with` entry matches no provisioner name or type
    #[error("'{name}' is not a known provisioner name or type")]
    InvalidProvisioner { name: String },

    /// The parallel worker pool could not be created
    #[error("failed to create worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for bringup operations
pub type Result<T> = std::result::Result<T, Error>;
