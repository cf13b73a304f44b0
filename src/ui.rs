use colored::Colorize;

use bringup::{Failure, MachineResult, MessageSink, Recovery, RunSummary};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

// ============================================================================
// Run output
// ============================================================================

/// Message sink that writes to the terminal
pub struct Terminal {
    pub quiet: bool,
}

impl MessageSink for Terminal {
    fn info(&mut self, msg: &str) {
        if !self.quiet {
            info(msg);
        }
    }

    fn warn(&mut self, msg: &str) {
        warn(msg);
    }

    fn blank(&mut self) {
        println!();
    }

    fn machine_success(&mut self, machine: &str, msg: &str) {
        success(&format!("{}: {}", machine.bold(), msg));
    }
}

/// One-line description of a failure's recovery
pub fn recovery_note(failure: &Failure) -> Option<String> {
    match &failure.recovery {
        Recovery::Skipped => None,
        Recovery::Destroyed => Some("machine was destroyed".to_string()),
        Recovery::DestroyFailed { error } => Some(format!("destroy also failed: {error}")),
    }
}

/// Print the failure detail of every machine that didn't come up
pub fn print_failures(results: &[MachineResult]) {
    for result in results {
        let Some(failure) = result.outcome.failure() else {
            continue;
        };
        error(&format!(
            "{} failed to start: {}",
            result.machine.name.bold(),
            failure.error
        ));
        if let Some(note) = recovery_note(failure) {
            dim(&note);
        }
    }
}

/// Print final summary
pub fn print_summary(summary: &RunSummary) {
    println!();
    if summary.is_success() {
        println!(
            "  {} {} {} up",
            "✓".green().bold(),
            summary.succeeded,
            plural(summary.succeeded, "machine")
        );
        return;
    }

    println!(
        "  {} {} of {} {} failed",
        "⚠".yellow().bold(),
        summary.failed,
        summary.total(),
        plural(summary.total(), "machine")
    );
    if summary.succeeded > 0 {
        println!("    • {} up", summary.succeeded);
    }
    if summary.destroyed > 0 {
        println!("    • {} destroyed", summary.destroyed);
    }
    if summary.destroy_failed > 0 {
        println!("    • {} {}", summary.destroy_failed, "could not be destroyed".red());
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_note() {
        let failure = |recovery| Failure {
            error: "boom".into(),
            recovery,
        };

        assert_eq!(recovery_note(&failure(Recovery::Skipped)), None);
        assert_eq!(
            recovery_note(&failure(Recovery::Destroyed)).as_deref(),
            Some("machine was destroyed")
        );
        assert_eq!(
            recovery_note(&failure(Recovery::DestroyFailed {
                error: "locked".into()
            }))
            .as_deref(),
            Some("destroy also failed: locked")
        );
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "machine"), "machine");
        assert_eq!(plural(0, "machine"), "machines");
        assert_eq!(plural(3, "machine"), "machines");
    }
}
