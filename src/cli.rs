//! CLI argument parsing and command dispatch

use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use crate::commands;

/// Values Overlay - Merge layered configuration values
#[derive(Parser, Debug)]
#[command(name = "values-overlay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge values directories, files, JSON and assignments into one document
    Merge(commands::merge::MergeArgs),

    /// List the live objects behind a rendered manifest
    Deployed(commands::deployed::DeployedArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level)?;

        match self.command {
            Commands::Merge(args) => commands::merge::execute(args, &self.color),
            Commands::Deployed(args) => commands::deployed::execute(args, &self.color),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Route `log` records to stderr at `level`. `RUST_LOG` is not consulted.
fn init_logging(level: &str) -> Result<()> {
    let filter = LevelFilter::from_str(level)
        .with_context(|| format!("Invalid log level '{}'", level))?;

    // A logger may already be installed when the CLI is driven from tests.
    let _ = env_logger::Builder::new()
        .filter_level(filter)
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["values-overlay", "merge", "--color", "never", "--log-level", "debug"]);
        assert_eq!(cli.color, "never");
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Commands::Merge(_)));
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        assert!(init_logging("loud").is_err());
        assert!(init_logging("INFO").is_ok());
    }
}
