//! Result reporting - post-up messages and the overall exit status

use crate::context::MessageSink;
use crate::types::{ExitStatus, MachineResult};

/// Emit post-up messages and compute the exit status
///
/// Only machines that came up and have a non-empty message produce
/// output. Failure details are left to the caller.
pub fn report(results: &[MachineResult], sink: &mut dyn MessageSink) -> ExitStatus {
    for result in results.iter().filter(|r| r.is_success()) {
        let Some(message) = result.post_up_message.as_deref() else {
            continue;
        };
        if message.is_empty() {
            continue;
        }

        sink.blank();
        sink.machine_success(&result.machine.name, message);
    }

    exit_status(results)
}

/// `Success` iff every machine came up
pub fn exit_status(results: &[MachineResult]) -> ExitStatus {
    if results.iter().all(MachineResult::is_success) {
        ExitStatus::Success
    } else {
        ExitStatus::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Transcript;
    use crate::machine::MachineRef;
    use crate::types::{Failure, Outcome, Recovery};

    fn result(name: &str, message: Option<&str>, ok: bool) -> MachineResult {
        let machine = MachineRef {
            post_up_message: message.map(str::to_string),
            ..MachineRef::new(name, "docker")
        };
        let outcome = if ok {
            Outcome::Success
        } else {
            Outcome::Failed(Failure {
                error: "boom".into(),
                recovery: Recovery::Destroyed,
            })
        };
        MachineResult::new(machine, outcome)
    }

    #[test]
    fn test_messages_only_for_successful_machines() {
        let results = vec![
            result("web", Some("open http://localhost:8080"), true),
            result("db", Some("psql is ready"), false),
            result("cache", Some(""), true),
            result("queue", None, true),
        ];
        let mut sink = Transcript::new();
        let status = report(&results, &mut sink);

        assert_eq!(sink.lines, vec!["", "web: open http://localhost:8080"]);
        assert!(!status.is_success());
        assert_ne!(status.code(), 0);
    }

    #[test]
    fn test_all_success_exits_zero() {
        let results = vec![result("a", None, true), result("b", Some("hi"), true)];
        let mut sink = Transcript::new();

        assert_eq!(report(&results, &mut sink).code(), 0);
        assert_eq!(sink.lines, vec!["", "b: hi"]);
    }

    #[test]
    fn test_empty_run_is_success() {
        assert_eq!(exit_status(&[]), ExitStatus::Success);
    }
}
