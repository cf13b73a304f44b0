//! Provider actions backed by commands declared in the Fleetfile

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::process::Command;
use thiserror::Error;

use crate::config::ProviderCommands;
use bringup::{ActionKind, ActionRunner, MachineRef, RunOptions};

/// Why a provider command could not be run
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no commands configured for provider '{0}'")]
    UnknownProvider(String),

    #[error("provider '{provider}' has no {action} command")]
    MissingAction {
        provider: String,
        action: ActionKind,
    },

    #[error("provider '{provider}' has an empty {action} command")]
    EmptyCommand {
        provider: String,
        action: ActionKind,
    },

    #[error("{command} exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },
}

/// Runs provider commands for each machine action
pub struct CommandRunner {
    providers: BTreeMap<String, ProviderCommands>,
}

impl CommandRunner {
    pub fn new(providers: BTreeMap<String, ProviderCommands>) -> Self {
        Self { providers }
    }

    /// Argv for an action, with placeholders filled in
    fn argv(&self, machine: &MachineRef, kind: ActionKind) -> Result<Vec<String>, RunnerError> {
        let commands = self
            .providers
            .get(&machine.provider)
            .ok_or_else(|| RunnerError::UnknownProvider(machine.provider.clone()))?;

        let template = match kind {
            ActionKind::Up => Some(&commands.up),
            ActionKind::Destroy => commands.destroy.as_ref(),
        }
        .ok_or_else(|| RunnerError::MissingAction {
            provider: machine.provider.clone(),
            action: kind,
        })?;

        if template.is_empty() {
            return Err(RunnerError::EmptyCommand {
                provider: machine.provider.clone(),
                action: kind,
            });
        }

        Ok(template
            .iter()
            .map(|arg| expand(arg, machine))
            .collect())
    }
}

impl ActionRunner for CommandRunner {
    fn run(&self, machine: &MachineRef, kind: ActionKind, options: &RunOptions) -> Result<()> {
        let argv = self.argv(machine, kind)?;
        let (cmd, args) = argv
            .split_first()
            .context("provider command is empty")?;

        log::debug!("{} '{}': {}", kind, machine.name, argv.join(" "));

        let mut command = Command::new(cmd);
        command.args(args);
        for (key, value) in action_env(machine, kind, options) {
            command.env(key, value);
        }

        let output = command
            .output()
            .with_context(|| format!("Failed to execute: {}", argv.join(" ")))?;

        if output.status.success() {
            return Ok(());
        }

        Err(RunnerError::Failed {
            command: cmd.clone(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into())
    }
}

fn expand(arg: &str, machine: &MachineRef) -> String {
    arg.replace("{machine}", &machine.name)
        .replace("{provider}", &machine.provider)
}

/// Environment exported to provider commands
fn action_env(
    machine: &MachineRef,
    kind: ActionKind,
    options: &RunOptions,
) -> Vec<(&'static str, String)> {
    let flag = |b: bool| String::from(if b { "1" } else { "0" });

    let mut env = vec![
        ("FLEETUP_MACHINE", machine.name.clone()),
        ("FLEETUP_PROVIDER", machine.provider.clone()),
        ("FLEETUP_ACTION", kind.to_string()),
        ("FLEETUP_DESTROY_ON_ERROR", flag(options.destroy_on_error)),
        (
            "FLEETUP_PROVISION_IGNORE_SENTINEL",
            flag(options.provision_ignore_sentinel),
        ),
    ];
    if let Some(enabled) = options.provision.enabled {
        env.push(("FLEETUP_PROVISION", flag(enabled)));
    }
    if let Some(types) = &options.provision.types {
        env.push(("FLEETUP_PROVISION_WITH", types.join(",")));
    }
    env
}
