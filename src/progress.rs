//! Progress display for batch runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use bringup::{MachineRef, MachineResult, ProgressCallback};

/// Create a progress bar with the given total
pub fn bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.cyan} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Progress callback drawing a bar on the terminal
pub struct BarProgress {
    hidden: bool,
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new(hidden: bool) -> Self {
        Self { hidden, bar: None }
    }
}

impl ProgressCallback for BarProgress {
    fn on_batch_start(&mut self, count: usize, parallel: bool) {
        if self.hidden {
            return;
        }
        let prefix = if parallel { "Starting" } else { "Starting (sequential)" };
        self.bar = Some(bar(count as u64, prefix));
    }

    fn on_machine_start(&mut self, machine: &MachineRef) {
        if let Some(pb) = &self.bar {
            pb.set_message(format!("→ {}", machine.name));
        }
    }

    fn on_machine_complete(&mut self, result: &MachineResult) {
        if let Some(pb) = &self.bar {
            let symbol = if result.is_success() {
                "✓".green()
            } else {
                "✗".red()
            };
            pb.set_message(format!("{} {}", symbol, result.machine.name));
            pb.inc(1);
        }
    }

    fn on_batch_complete(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }
}
