use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bringup::{MachineDefinition, MachineRegistry};

/// Environment variable overriding the Fleetfile's default provider
pub const ENV_DEFAULT_PROVIDER: &str = "FLEETUP_DEFAULT_PROVIDER";

// ============================================================================
// Fleetfile
// ============================================================================

/// Project file declaring providers and machines
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fleetfile {
    /// Provider for machines that don't name one
    #[serde(default)]
    pub default_provider: Option<String>,

    /// Commands that implement each provider's actions
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderCommands>,

    /// Machines in declared order
    #[serde(default)]
    pub machines: Vec<MachineDefinition>,
}

/// Argv templates for a provider's actions
///
/// `{machine}` and `{provider}` are substituted before running.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderCommands {
    pub up: Vec<String>,
    #[serde(default)]
    pub destroy: Option<Vec<String>>,
}

impl Fleetfile {
    /// Load a Fleetfile
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid Fleetfile: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let fleetfile: Self = toml::from_str(content)?;
        fleetfile.check_unique_names()?;
        Ok(fleetfile)
    }

    fn check_unique_names(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for machine in &self.machines {
            if !seen.insert(machine.name.as_str()) {
                anyhow::bail!("machine '{}' is defined more than once", machine.name);
            }
        }
        Ok(())
    }

    /// Machine registry, with `default_override` taking precedence over
    /// the file's default provider
    pub fn registry(&self, default_override: Option<String>) -> MachineRegistry {
        MachineRegistry {
            default_provider: default_override.or_else(|| self.default_provider.clone()),
            machines: self.machines.clone(),
        }
    }
}

/// Directory the project lives in (where `FleetProvider` is looked up)
pub fn project_dir(fleetfile: &Path) -> PathBuf {
    match fleetfile.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Default provider from the environment, if set and non-empty
pub fn default_provider_from_env() -> Option<String> {
    std::env::var(ENV_DEFAULT_PROVIDER)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
