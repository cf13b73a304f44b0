use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use bringup::{ProvisionOptions, RunOptions};

#[derive(Parser)]
#[command(name = "fleetup")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Bring up the machines of a project", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project file listing the machines
    #[arg(
        short,
        long,
        global = true,
        env = "FLEETUP_FILE",
        default_value = "Fleetfile.toml"
    )]
    pub file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start and provision machines
    Up(UpArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Up
// ============================================================================

#[derive(Args, Debug)]
pub struct UpArgs {
    /// Machines to bring up (default: every autostart machine)
    pub names: Vec<String>,

    /// Destroy a machine if any fatal error happens (default)
    #[arg(long, overrides_with = "no_destroy_on_error")]
    pub destroy_on_error: bool,

    /// Leave a failed machine as-is
    #[arg(long, overrides_with = "destroy_on_error")]
    pub no_destroy_on_error: bool,

    /// Start machines in parallel (default)
    #[arg(long, overrides_with = "no_parallel")]
    pub parallel: bool,

    /// Start machines one at a time
    #[arg(long, overrides_with = "parallel")]
    pub no_parallel: bool,

    /// Back the machines with a specific provider
    #[arg(long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Force provisioning
    #[arg(long, overrides_with = "no_provision")]
    pub provision: bool,

    /// Skip provisioning
    #[arg(long, overrides_with = "provision")]
    pub no_provision: bool,

    /// Only run these provisioners, by name or type
    #[arg(long, value_name = "x,y,z", value_delimiter = ',')]
    pub provision_with: Option<Vec<String>>,
}

impl UpArgs {
    /// Build the run options these flags describe
    pub fn run_options(&self) -> RunOptions {
        let mut provision = ProvisionOptions {
            enabled: match (self.provision, self.no_provision) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
            types: None,
        };

        if let Some(types) = &self.provision_with {
            provision.types = Some(types.clone());
            provision.enabled = Some(true);
        }

        RunOptions {
            destroy_on_error: self.destroy_on_error || !self.no_destroy_on_error,
            parallel: self.parallel || !self.no_parallel,
            provider: self.provider.clone(),
            provision_ignore_sentinel: provision.enabled.is_some(),
            provision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn up_args(args: &[&str]) -> UpArgs {
        let cli = Cli::try_parse_from(["fleetup", "up"].iter().chain(args)).unwrap();
        match cli.command {
            Command::Up(args) => args,
            Command::Completions { .. } => panic!("expected up"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let opts = up_args(&[]).run_options();
        assert_eq!(opts, RunOptions::default());
    }

    #[test]
    fn test_negated_flags() {
        let args = up_args(&["--no-destroy-on-error", "--no-parallel", "web", "db"]);
        let opts = args.run_options();
        assert!(!opts.destroy_on_error);
        assert!(!opts.parallel);
        assert_eq!(args.names, vec!["web", "db"]);
    }

    #[test]
    fn test_last_flag_wins() {
        let opts = up_args(&["--no-parallel", "--parallel"]).run_options();
        assert!(opts.parallel);
    }

    #[test]
    fn test_provider_flag() {
        let opts = up_args(&["--provider", "docker"]).run_options();
        assert_eq!(opts.provider.as_deref(), Some("docker"));
    }

    #[test]
    fn test_provision_flags_set_ignore_sentinel() {
        let opts = up_args(&["--no-provision"]).run_options();
        assert_eq!(opts.provision.enabled, Some(false));
        assert!(opts.provision_ignore_sentinel);

        let opts = up_args(&["--provision-with", "shell,bootstrap"]).run_options();
        assert_eq!(opts.provision.enabled, Some(true));
        assert_eq!(
            opts.provision.types,
            Some(vec!["shell".to_string(), "bootstrap".to_string()])
        );
        assert!(opts.provision_ignore_sentinel);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["fleetup", "up", "--paralel"]).is_err());
    }
}
