//! # Values Overlay Library
//!
//! This library folds configuration values from many sources into one tree.
//! It backs the `values-overlay` command-line tool but can be embedded in any
//! program that layers defaults, environment files and command-line
//! overrides.
//!
//! ## Quick Example
//!
//! ```
//! use values_overlay::getter::Providers;
//! use values_overlay::pipeline::ValueOptions;
//!
//! let options = ValueOptions {
//!     json_values: vec![r#"{"image": {"repository": "nginx", "tag": "1.25"}}"#.to_string()],
//!     values: vec!["image.tag=1.27,replicas=3".to_string()],
//!     string_values: vec!["build=0123".to_string()],
//!     ..Default::default()
//! };
//!
//! let merged = options.merge_values(&Providers::new()).unwrap();
//! assert_eq!(merged["image"]["repository"], "nginx");
//! assert_eq!(merged["image"]["tag"], "1.27");
//! assert_eq!(merged["replicas"], 3);
//! assert_eq!(merged["build"], "0123");
//! ```
//!
//! ## Core Concepts
//!
//! - **Deep merge (`merge`)**: combines two trees, overlay wins, nested
//!   mappings are merged and everything else is replaced.
//! - **Sources (`source`, `getter`)**: a reference is standard input (`-`), a
//!   URL handled by a registered getter, or a local path.
//! - **Directory walking (`filesystem`)**: every `.yaml` file below a values
//!   directory, in lexicographic order.
//! - **Assignments (`strvals`)**: `a.b[0]=x` style flat overrides applied in
//!   place.
//! - **Pipeline (`pipeline`)**: applies the seven tiers in fixed precedence
//!   order into a single accumulator.
//! - **Resource listing (`deployed`)**: the live objects behind a rendered
//!   manifest, as a table, JSON or YAML.
//!
//! ## Precedence
//!
//! Lowest to highest:
//!
//! 1. Values directories
//! 2. Values files
//! 3. `--set-json`
//! 4. `--set`
//! 5. `--set-string`
//! 6. `--set-file`
//! 7. `--set-literal`

pub mod cancel;
pub mod defaults;
pub mod deployed;
pub mod error;
pub mod filesystem;
pub mod getter;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod strvals;
pub mod suggestions;
pub mod values;

#[cfg(test)]
mod merge_proptest;
