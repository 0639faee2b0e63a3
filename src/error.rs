//! # Error Handling
//!
//! This module defines the centralized error type for `values-overlay`. It
//! uses `thiserror` to derive an `Error` enum whose variants map one-to-one
//! onto the ways a values merge can fail.
//!
//! ## Key Components
//!
//! - **`Error`**: every failure carries the identifier of the source that
//!   caused it (a path, a URL, or the raw inline entry) and, where it applies,
//!   the tier the source belonged to. A caller can always tell which input
//!   broke the merge.
//!
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`.
//!
//! Nothing in the library retries. The first error aborts the whole merge and
//! no partial tree is handed back.

use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Tier;
use crate::strvals::ParseError;

/// Main error type for values-overlay operations
#[derive(Error, Debug)]
pub enum Error {
    /// Raw bytes could not be retrieved for a source reference.
    ///
    /// Covers missing files, unreachable URLs, malformed locators and
    /// standard-input failures.
    #[error("failed to retrieve {reference}: {message}")]
    Retrieval { reference: String, message: String },

    /// A values directory could not be listed.
    #[error("failed to list files in {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document or raw JSON payload is not a valid values mapping.
    ///
    /// `source_id` is the path for documents and the literal input string for
    /// JSON payloads.
    #[error("failed to parse {source_id} ({tier}): {message}")]
    Format {
        tier: Tier,
        source_id: String,
        message: String,
    },

    /// A flat assignment could not be applied to the accumulator.
    #[error("failed parsing {tier} data {entry:?}: {source}")]
    AssignmentSyntax {
        tier: Tier,
        entry: String,
        #[source]
        source: ParseError,
    },

    /// The merge was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// The cluster could not answer a resource lookup.
    #[error("cluster error: {message}")]
    Cluster { message: String },

    /// A rendered manifest could not be split into resources.
    #[error("manifest error: {message}")]
    Manifest { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
