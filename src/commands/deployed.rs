//! # Deployed Command Implementation
//!
//! This module implements the `deployed` subcommand, which lists the live
//! objects behind a rendered manifest.
//!
//! The manifest is read like any values source (a path, a URL, or `-` for
//! standard input). Live objects come from a recorded cluster state file, a
//! YAML list in the shape of `kubectl get -o yaml` items.
//!
//! ## Example
//!
//! ```bash
//! helm template web ./chart | values-overlay deployed --manifest - --cluster-state live.yaml
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};
use log::info;

use values_overlay::defaults::{DEFAULT_HTTP_TIMEOUT_SECS, HTTP_TIMEOUT_ENV};
use values_overlay::deployed::{get_deployed, ListFormat, ResourceListWriter, SnapshotCluster};
use values_overlay::getter::Providers;
use values_overlay::output::OutputConfig;
use values_overlay::source::SourceReader;
use values_overlay::suggestions;

/// Output format for the resource listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListOutput {
    Table,
    Json,
    Yaml,
}

impl From<ListOutput> for ListFormat {
    fn from(output: ListOutput) -> Self {
        match output {
            ListOutput::Table => ListFormat::Table,
            ListOutput::Json => ListFormat::Json,
            ListOutput::Yaml => ListFormat::Yaml,
        }
    }
}

/// List the live objects behind a rendered manifest
#[derive(Args, Debug)]
pub struct DeployedArgs {
    /// Rendered manifest: a path, a URL, or '-' for standard input
    #[arg(long, value_name = "REF")]
    pub manifest: String,

    /// YAML list of live objects to look resources up in
    #[arg(long, value_name = "FILE")]
    pub cluster_state: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ListOutput::Table)]
    pub output: ListOutput,

    /// Omit the table header
    #[arg(long)]
    pub no_headers: bool,

    /// Timeout for an HTTP(S) manifest, in seconds
    #[arg(long, value_name = "SECS", env = HTTP_TIMEOUT_ENV, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout: u64,
}

/// Execute the `deployed` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: DeployedArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);

    let providers = Providers::with_defaults(Duration::from_secs(args.http_timeout))
        .map_err(suggestions::with_hint)?;
    let reader = SourceReader::new(&providers);
    let manifest = reader.read(&args.manifest).map_err(suggestions::with_hint)?;
    let manifest = String::from_utf8_lossy(&manifest);

    let cluster = SnapshotCluster::load(&args.cluster_state).map_err(suggestions::with_hint)?;
    info!(
        "Loaded {} live object(s) from {}",
        cluster.len(),
        args.cluster_state.display()
    );

    let resources = get_deployed(&manifest, &cluster).map_err(suggestions::with_hint)?;

    let mut stdout = io::stdout().lock();
    ResourceListWriter::new(&resources, args.no_headers)
        .with_bold_headers(out.table_headers)
        .write(&mut stdout, args.output.into(), Utc::now())?;
    stdout.flush()?;
    Ok(())
}
