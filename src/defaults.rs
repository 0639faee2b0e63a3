//! Default values for values-overlay.
//!
//! This module provides centralized defaults and limits used across the
//! library and the commands, keeping them consistent and in one place.

/// Extension of the documents collected from a values directory.
pub const VALUES_EXTENSION: &str = ".yaml";

/// Source reference that stands for the process's standard input.
pub const STDIN_SENTINEL: &str = "-";

/// Largest list index an inline assignment may address.
pub const MAX_INDEX: usize = 65536;

/// Deepest dotted key an inline assignment may address.
pub const MAX_NESTED_NAME_LEVEL: usize = 30;

/// Environment variable overriding the HTTP retrieval timeout (seconds).
pub const HTTP_TIMEOUT_ENV: &str = "VALUES_OVERLAY_HTTP_TIMEOUT";

/// Default HTTP retrieval timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
