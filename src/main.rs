//! # Values Overlay CLI
//!
//! This is the binary entry point for the `values-overlay` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Dispatching to the matching subcommand.
//!
//! The merge engine itself lives in the `values_overlay` library crate; the
//! binary is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
