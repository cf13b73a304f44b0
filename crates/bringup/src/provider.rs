//! Provider resolution
//!
//! A project can pin its provider in a `FleetProvider` file. The pinned
//! value always wins over `--provider`; a disagreement is reported as a
//! warning, never as an error.

use crate::context::MessageSink;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// File name of the persisted project provider
pub const PROVIDER_FILE: &str = "FleetProvider";

/// A flag value that lost to the persisted provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConflict {
    /// Value given with `--provider`
    pub requested: String,
    /// Value read from the provider file
    pub persisted: String,
}

/// Outcome of provider resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Provider for the whole run; `None` defers to each machine
    pub effective: Option<String>,
    pub conflict: Option<ProviderConflict>,
}

/// Combine the flag value with the persisted value
pub fn resolve(flag: Option<&str>, persisted: Option<&str>) -> Resolution {
    match (flag, persisted) {
        (Some(requested), Some(persisted)) if requested != persisted => Resolution {
            effective: Some(persisted.to_string()),
            conflict: Some(ProviderConflict {
                requested: requested.to_string(),
                persisted: persisted.to_string(),
            }),
        },
        (_, Some(persisted)) => Resolution {
            effective: Some(persisted.to_string()),
            conflict: None,
        },
        (flag, None) => Resolution {
            effective: flag.map(str::to_string),
            conflict: None,
        },
    }
}

/// Source of the persisted provider value
pub trait ProviderSource {
    /// Display name used in diagnostics
    fn name(&self) -> String;

    /// Read the persisted provider, `None` if there is none
    fn read(&self) -> Option<String>;
}

/// Provider pinned in a file on disk
#[derive(Debug, Clone)]
pub struct ProviderFile {
    path: PathBuf,
}

impl ProviderFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The provider file inside a project directory
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PROVIDER_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProviderSource for ProviderFile {
    fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn read(&self) -> Option<String> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                log::debug!("No provider file at {}: {}", self.path.display(), e);
                return None;
            }
        };

        log::debug!("Reading provider from '{}'", self.path.display());
        let mut line = String::new();
        if let Err(e) = BufReader::new(file).read_line(&mut line) {
            log::debug!("Could not read {}: {}", self.path.display(), e);
            return None;
        }

        let provider = line.trim();
        log::debug!("Provider = '{provider}'");
        if provider.is_empty() {
            None
        } else {
            Some(provider.to_string())
        }
    }
}

/// No persisted provider
pub struct NoProviderFile;

impl ProviderSource for NoProviderFile {
    fn name(&self) -> String {
        PROVIDER_FILE.to_string()
    }

    fn read(&self) -> Option<String> {
        None
    }
}

/// Read the source once and resolve against the flag, reporting to `sink`
pub fn resolve_from(
    flag: Option<&str>,
    source: &dyn ProviderSource,
    sink: &mut dyn MessageSink,
) -> Resolution {
    let persisted = source.read();

    if let Some(p) = &persisted {
        sink.info(&format!(
            "{} file exists, using '{}' as the provider",
            source.name(),
            p
        ));
    }

    let resolution = resolve(flag, persisted.as_deref());
    if let Some(conflict) = &resolution.conflict {
        sink.warn(&format!(
            "provider '{}' already specified, using '{}' instead",
            conflict.requested, conflict.persisted
        ));
    }

    resolution
}
