//! Target selection - turns the names given on the command line into
//! the machines a run acts on

use crate::error::{Error, Result};
use crate::machine::{MachineDefinition, MachineRef, MachineRegistry};
use crate::types::RunOptions;
use std::collections::HashSet;

/// Select the machines to bring up
///
/// With explicit `names`, each one must exist in the registry; the
/// result keeps first-occurrence order and drops repeats. Without names,
/// every machine whose autostart flag is true or unset is selected, in
/// declared order.
///
/// `provider` is the run's effective provider. When absent, each machine
/// falls back to its own provider and then to the registry default.
pub fn select(
    names: &[String],
    registry: &MachineRegistry,
    provider: Option<&str>,
) -> Result<Vec<MachineRef>> {
    let definitions: Vec<&MachineDefinition> = if names.is_empty() {
        registry
            .machines
            .iter()
            .filter(|m| m.starts_by_default())
            .collect()
    } else {
        names
            .iter()
            .map(|name| {
                registry.find(name).ok_or_else(|| Error::UnknownMachine {
                    name: name.clone(),
                    known: registry.names(),
                })
            })
            .collect::<Result<_>>()?
    };

    let mut seen = HashSet::new();
    let machines: Vec<MachineRef> = definitions
        .into_iter()
        .filter(|def| seen.insert(def.name.clone()))
        .map(|def| {
            let provider = provider.unwrap_or_else(|| registry.provider_for(def));
            MachineRef::from_definition(def, provider)
        })
        .collect();

    log::debug!(
        "Selected {} machine(s): {}",
        machines.len(),
        machines
            .iter()
            .map(|m| m.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(machines)
}

/// Check `--provision-with` entries against the selected machines
///
/// An entry may name a provisioner on one of the machines. If none of the
/// entries does, each must instead be a provisioner type the registry
/// knows about.
pub fn validate_provisioner_flags(
    options: &RunOptions,
    machines: &[MachineRef],
    registry: &MachineRegistry,
) -> Result<()> {
    let Some(requested) = &options.provision.types else {
        return Ok(());
    };

    let names: HashSet<&str> = machines
        .iter()
        .flat_map(|m| m.provisioners.iter().map(|p| p.name()))
        .collect();

    if requested.iter().any(|r| names.contains(r.as_str())) {
        return Ok(());
    }

    let known_types = registry.provisioner_types();
    if let Some(invalid) = requested
        .iter()
        .find(|r| !known_types.contains(&r.as_str()))
    {
        return Err(Error::InvalidProvisioner {
            name: invalid.clone(),
        });
    }

    Ok(())
}
