//! # CLI Command Implementations
//!
//! One file per `values-overlay` subcommand. Each holds an `Args` struct
//! derived with `clap` and an `execute` function that calls into the
//! `values_overlay` library.

pub mod completions;
pub mod deployed;
pub mod merge;
