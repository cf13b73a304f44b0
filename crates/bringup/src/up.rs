//! The `up` pipeline: resolve provider, select machines, run the batch,
//! report

use crate::batch::Batch;
use crate::context::{ActionRunner, MessageSink, ProgressCallback};
use crate::error::Result;
use crate::machine::MachineRegistry;
use crate::provider::{ProviderSource, resolve_from};
use crate::selector::{select, validate_provisioner_flags};
use crate::types::{ExitStatus, MachineResult, RunOptions};

/// What to bring up
pub struct UpRequest<'a> {
    /// Machine names from the command line; empty means autostart machines
    pub names: &'a [String],
    pub options: RunOptions,
    pub registry: &'a MachineRegistry,
}

/// Results of a completed run
#[derive(Debug)]
pub struct UpOutcome {
    /// Options after provider resolution
    pub options: RunOptions,
    /// One result per selected machine, in selection order
    pub results: Vec<MachineResult>,
    pub status: ExitStatus,
}

/// Bring up the requested machines
///
/// Errors are returned only for problems found before the batch starts
/// (unknown machine, invalid provisioner flag, worker pool setup). Machine
/// failures are part of the returned results.
pub fn up<R, P>(
    request: UpRequest<'_>,
    runner: &R,
    provider_source: &dyn ProviderSource,
    sink: &mut dyn MessageSink,
    progress: &mut P,
) -> Result<UpOutcome>
where
    R: ActionRunner + ?Sized,
    P: ProgressCallback + ?Sized,
{
    let UpRequest {
        names,
        options,
        registry,
    } = request;

    let resolution = resolve_from(options.provider.as_deref(), provider_source, sink);
    let options = options.with_resolved_provider(resolution.effective);

    let machines = select(names, registry, options.provider.as_deref())?;
    validate_provisioner_flags(&options, &machines, registry)?;

    log::debug!("'Up' each target machine...");
    let mut batch = Batch::new(options.clone());
    for machine in machines {
        sink.info(&format!(
            "Bringing machine '{}' up with '{}' provider...",
            machine.name, machine.provider
        ));
        batch.add(machine);
    }

    let results = batch.run(runner, progress)?;
    let status = crate::report::report(&results, sink);

    Ok(UpOutcome {
        options,
        results,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{NoProgress, Transcript};
    use crate::error::Error;
    use crate::machine::{MachineDefinition, MachineRef};
    use crate::provider::{NoProviderFile, PROVIDER_FILE, ProviderFile};
    use crate::types::ActionKind;
    use std::sync::Mutex;

    fn registry() -> MachineRegistry {
        MachineRegistry::new(vec![
            MachineDefinition {
                post_up_message: Some("web is ready".into()),
                ..MachineDefinition::new("web")
            },
            MachineDefinition {
                autostart: Some(false),
                ..MachineDefinition::new("db")
            },
            MachineDefinition::new("worker"),
        ])
    }

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, String, ActionKind)>>,
        fail: Option<&'static str>,
    }

    impl ActionRunner for Recorder {
        fn run(
            &self,
            machine: &MachineRef,
            kind: ActionKind,
            _options: &RunOptions,
        ) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((machine.name.clone(), machine.provider.clone(), kind));
            if kind == ActionKind::Up && self.fail == Some(machine.name.as_str()) {
                anyhow::bail!("provider refused");
            }
            Ok(())
        }
    }

    #[test]
    fn test_up_autostart_machines_with_persisted_provider() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PROVIDER_FILE), "docker\n").unwrap();

        let runner = Recorder::default();
        let mut sink = Transcript::new();
        let registry = registry();
        let outcome = up(
            UpRequest {
                names: &[],
                options: RunOptions {
                    provider: Some("virtualbox".into()),
                    ..Default::default()
                },
                registry: &registry,
            },
            &runner,
            &ProviderFile::in_dir(dir.path()),
            &mut sink,
            &mut NoProgress,
        )
        .unwrap();

        assert_eq!(outcome.options.provider.as_deref(), Some("docker"));
        assert_eq!(outcome.status, ExitStatus::Success);
        assert_eq!(outcome.results.len(), 2);
        assert!(
            runner
                .calls
                .lock()
                .unwrap()
                .iter()
                .all(|(_, provider, _)| provider == "docker")
        );

        assert_eq!(sink.warnings().len(), 1);
        assert!(sink
            .lines
            .contains(&"Bringing machine 'worker' up with 'docker' provider...".to_string()));
        assert_eq!(sink.lines.last().unwrap(), "web: web is ready");
    }

    #[test]
    fn test_unknown_machine_starts_nothing() {
        let runner = Recorder::default();
        let registry = registry();
        let names = vec!["web".to_string(), "ghost".to_string()];
        let err = up(
            UpRequest {
                names: &names,
                options: RunOptions::default(),
                registry: &registry,
            },
            &runner,
            &NoProviderFile,
            &mut Transcript::new(),
            &mut NoProgress,
        )
        .unwrap_err();

        assert!(matches!(err, Error::UnknownMachine { .. }));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failed_machine_gets_no_message_and_fails_run() {
        let runner = Recorder {
            fail: Some("web"),
            ..Default::default()
        };
        let registry = registry();
        let names = vec!["web".to_string(), "db".to_string()];
        let mut sink = Transcript::new();
        let outcome = up(
            UpRequest {
                names: &names,
                options: RunOptions::default(),
                registry: &registry,
            },
            &runner,
            &NoProviderFile,
            &mut sink,
            &mut NoProgress,
        )
        .unwrap();

        assert_ne!(outcome.status.code(), 0);
        assert!(!outcome.results[0].is_success());
        assert!(outcome.results[1].is_success());
        assert!(!sink.lines.iter().any(|l| l.contains("web is ready")));
        assert!(
            runner
                .calls
                .lock()
                .unwrap()
                .contains(&("web".into(), "virtualbox".into(), ActionKind::Destroy))
        );
    }
}
