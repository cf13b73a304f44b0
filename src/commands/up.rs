//! `fleetup up` - start and provision the project's machines

use anyhow::Result;

use crate::Context;
use crate::cli::UpArgs;
use crate::config::{self, Fleetfile};
use crate::progress::BarProgress;
use crate::runner::CommandRunner;
use crate::ui;
use bringup::{ExitStatus, ProviderFile, RunSummary, UpRequest};

/// Run `up` and return the process exit status
pub fn run(ctx: &Context, args: UpArgs) -> Result<ExitStatus> {
    let fleetfile = Fleetfile::load(&ctx.file)?;
    let registry = fleetfile.registry(config::default_provider_from_env());
    let provider_file = ProviderFile::in_dir(&config::project_dir(&ctx.file));
    let runner = CommandRunner::new(fleetfile.providers);

    let options = args.run_options();
    log::debug!("Run options: {options:?}");

    let mut terminal = ui::Terminal { quiet: ctx.quiet };
    let mut progress = BarProgress::new(ctx.quiet || ctx.verbose > 0);

    let outcome = bringup::up(
        UpRequest {
            names: &args.names,
            options,
            registry: &registry,
        },
        &runner,
        &provider_file,
        &mut terminal,
        &mut progress,
    )?;

    if outcome.results.is_empty() {
        ui::info("No machines to bring up");
        return Ok(outcome.status);
    }

    ui::print_failures(&outcome.results);
    if !ctx.quiet {
        ui::print_summary(&RunSummary::from_results(&outcome.results));
    }

    Ok(outcome.status)
}
