//! # Merge Command Implementation
//!
//! This module implements the `merge` subcommand, which folds every values
//! source given on the command line into one document and prints it.
//!
//! ## Precedence
//!
//! Sources are applied lowest to highest, regardless of the order the flags
//! appear in:
//!
//! 1. `-d/--values-directory`
//! 2. `-f/--values`
//! 3. `--set-json`
//! 4. `--set`
//! 5. `--set-string`
//! 6. `--set-file`
//! 7. `--set-literal`
//!
//! Repeating a flag appends to its tier; within a tier, later entries win.
//!
//! ## Example
//!
//! ```bash
//! values-overlay merge -d values.d -f prod.yaml --set image.tag=1.2.3 -o json
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::warn;

use values_overlay::cancel::CancelToken;
use values_overlay::defaults::{DEFAULT_HTTP_TIMEOUT_SECS, HTTP_TIMEOUT_ENV};
use values_overlay::getter::Providers;
use values_overlay::output::{Marker, OutputConfig};
use values_overlay::pipeline::{Tier, ValueOptions};
use values_overlay::source::SourceReader;
use values_overlay::strvals::DottedAssigner;
use values_overlay::suggestions;
use values_overlay::values;

/// Serialization of the merged document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Merge layered values sources into one document
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Directory whose .yaml files are merged in lexicographic order (can specify multiple)
    #[arg(short = 'd', long = "values-directory", value_name = "DIR")]
    pub values_directories: Vec<String>,

    /// Values document: a path, a URL, or '-' for standard input (can specify multiple)
    #[arg(short = 'f', long = "values", value_name = "REF")]
    pub value_files: Vec<String>,

    /// JSON object, or key=<json> assignments (can specify multiple)
    #[arg(long = "set-json", value_name = "JSON")]
    pub json_values: Vec<String>,

    /// Assignments such as a.b=1,c[0]=x; scalars are typed (can specify multiple)
    #[arg(long = "set", value_name = "ASSIGNMENTS")]
    pub values: Vec<String>,

    /// Assignments whose values are always strings (can specify multiple)
    #[arg(long = "set-string", value_name = "ASSIGNMENTS")]
    pub string_values: Vec<String>,

    /// Assignments whose values are read from files (can specify multiple)
    #[arg(long = "set-file", value_name = "ASSIGNMENTS")]
    pub file_values: Vec<String>,

    /// One key=value whose value is taken verbatim (can specify multiple)
    #[arg(long = "set-literal", value_name = "ASSIGNMENT")]
    pub literal_values: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub output: OutputFormat,

    /// Write the merged document to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Timeout for HTTP(S) sources, in seconds
    #[arg(long, value_name = "SECS", env = HTTP_TIMEOUT_ENV, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout: u64,

    /// Print a summary of the sources to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl MergeArgs {
    fn value_options(&self) -> ValueOptions {
        ValueOptions {
            values_directories: self.values_directories.clone(),
            value_files: self.value_files.clone(),
            json_values: self.json_values.clone(),
            values: self.values.clone(),
            string_values: self.string_values.clone(),
            file_values: self.file_values.clone(),
            literal_values: self.literal_values.clone(),
        }
    }
}

/// Execute the `merge` command.
///
/// # Arguments
/// * `args` - The command arguments
/// * `color_flag` - The value of the global --color flag ("always", "never", or "auto")
pub fn execute(args: MergeArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let options = args.value_options();

    let providers = Providers::with_defaults(Duration::from_secs(args.http_timeout))
        .map_err(suggestions::with_hint)?;
    let reader = SourceReader::new(&providers);

    let cancel = CancelToken::new();
    if let Err(err) = cancel.install_ctrlc_handler() {
        warn!("Could not install the Ctrl-C handler: {}", err);
    }

    let merged = options
        .merge_values_with(&reader, &DottedAssigner, &cancel)
        .map_err(suggestions::with_hint)?;

    let rendered = match args.output {
        OutputFormat::Yaml => values::to_yaml_string(&merged)?,
        OutputFormat::Json => values::to_json_string(&merged)?,
    };

    match &args.output_file {
        Some(path) => fs::write(path, &rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }

    if args.verbose {
        eprintln!(
            "{} Merged {} top-level key(s)",
            out.marker(Marker::Merged),
            merged.len()
        );
        for tier in Tier::ALL {
            let count = options.entries(tier).len();
            if count > 0 {
                eprintln!("   {} {}: {}", tier.rank(), tier, count);
            }
        }
        if let Some(path) = &args.output_file {
            eprintln!("{} Wrote {}", out.marker(Marker::Wrote), path.display());
        }
    }

    Ok(())
}
