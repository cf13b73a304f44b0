//! Machine definitions and the registry they are read from
//!
//! The registry is owned by whoever loads the project configuration.
//! The orchestrator only reads it.

use serde::{Deserialize, Serialize};

/// Provider used when neither the run nor the machine names one
pub const DEFAULT_PROVIDER: &str = "virtualbox";

/// A provisioner attached to a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Provisioner {
    /// Name of this provisioner instance (defaults to its type)
    #[serde(default)]
    pub name: Option<String>,
    /// Provisioner type, e.g. "shell" or "ansible"
    #[serde(rename = "type")]
    pub kind: String,
}

impl Provisioner {
    /// Name used to match `--provision-with` entries
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.kind)
    }
}

/// A machine as declared in the project configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineDefinition {
    pub name: String,
    /// Provider this machine prefers
    #[serde(default)]
    pub provider: Option<String>,
    /// Whether `up` without names starts this machine (unset means yes)
    #[serde(default)]
    pub autostart: Option<bool>,
    /// Message shown after the machine comes up
    #[serde(default)]
    pub post_up_message: Option<String>,
    #[serde(default)]
    pub provisioners: Vec<Provisioner>,
}

impl MachineDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: None,
            autostart: None,
            post_up_message: None,
            provisioners: Vec::new(),
        }
    }

    /// Autostart policy: an unset flag counts as enabled
    pub fn starts_by_default(&self) -> bool {
        self.autostart.unwrap_or(true)
    }
}

/// A machine selected for a run, with its provider resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRef {
    pub name: String,
    pub provider: String,
    pub autostart: bool,
    pub post_up_message: Option<String>,
    pub provisioners: Vec<Provisioner>,
}

impl MachineRef {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            autostart: true,
            post_up_message: None,
            provisioners: Vec::new(),
        }
    }

    /// Bind a definition to the provider it will run under
    pub fn from_definition(definition: &MachineDefinition, provider: impl Into<String>) -> Self {
        Self {
            name: definition.name.clone(),
            provider: provider.into(),
            autostart: definition.starts_by_default(),
            post_up_message: definition.post_up_message.clone(),
            provisioners: definition.provisioners.clone(),
        }
    }
}

/// Ordered set of machine definitions for a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRegistry {
    /// Provider for machines that don't name one
    pub default_provider: Option<String>,
    /// Definitions in declared order
    pub machines: Vec<MachineDefinition>,
}

impl MachineRegistry {
    pub fn new(machines: Vec<MachineDefinition>) -> Self {
        Self {
            default_provider: None,
            machines,
        }
    }

    /// Find a machine by name
    pub fn find(&self, name: &str) -> Option<&MachineDefinition> {
        self.machines.iter().find(|m| m.name == name)
    }

    /// Machine names in declared order
    pub fn names(&self) -> Vec<String> {
        self.machines.iter().map(|m| m.name.clone()).collect()
    }

    pub fn default_provider(&self) -> &str {
        self.default_provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    /// Provider a machine runs under when the run doesn't force one
    pub fn provider_for<'a>(&'a self, definition: &'a MachineDefinition) -> &'a str {
        definition
            .provider
            .as_deref()
            .unwrap_or_else(|| self.default_provider())
    }

    /// Every provisioner type declared anywhere in the registry
    pub fn provisioner_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self
            .machines
            .iter()
            .flat_map(|m| m.provisioners.iter().map(|p| p.kind.as_str()))
            .collect();
        types.sort_unstable();
        types.dedup();
        types
    }
}
