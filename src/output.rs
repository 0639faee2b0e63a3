//! Terminal decoration for the CLI.
//!
//! Two things are ever decorated: the header row of the `deployed` table on
//! stdout and the status markers of the `merge --verbose` summary on stderr.
//! The merged document itself is always printed as is.
//!
//! `--color=always` and `--color=never` settle both. With `auto`, `NO_COLOR`
//! (https://no-color.org/) turns everything off, and otherwise each stream is
//! decorated only when `console` reports color support for it.

/// Which parts of the output get decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Bold headers on the `deployed` table (stdout).
    pub table_headers: bool,
    /// Emoji markers on the verbose merge summary (stderr).
    pub status_markers: bool,
}

/// A line prefix in the verbose merge summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Merged,
    Wrote,
}

impl Marker {
    fn decorated(self) -> &'static str {
        match self {
            Marker::Merged => "✅",
            Marker::Wrote => "📝",
        }
    }

    fn plain(self) -> &'static str {
        match self {
            Marker::Merged => "[OK]",
            Marker::Wrote => "[WRITE]",
        }
    }
}

impl OutputConfig {
    /// Resolve the global `--color` value ("always", "never" or "auto",
    /// case-insensitive). Anything else behaves like "auto".
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        if color_flag.eq_ignore_ascii_case("always") {
            return Self::uniform(true);
        }
        if color_flag.eq_ignore_ascii_case("never") || std::env::var_os("NO_COLOR").is_some() {
            return Self::uniform(false);
        }
        Self {
            table_headers: console::Term::stdout().features().colors_supported(),
            status_markers: console::Term::stderr().features().colors_supported(),
        }
    }

    fn uniform(enabled: bool) -> Self {
        Self {
            table_headers: enabled,
            status_markers: enabled,
        }
    }

    /// The prefix to print for `marker` on stderr.
    pub fn marker(&self, marker: Marker) -> &'static str {
        if self.status_markers {
            marker.decorated()
        } else {
            marker.plain()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_explicit_flag_applies_to_both_streams() {
        assert_eq!(
            OutputConfig::from_env_and_flag("always"),
            OutputConfig::uniform(true)
        );
        assert_eq!(
            OutputConfig::from_env_and_flag("Never"),
            OutputConfig::uniform(false)
        );
    }

    #[test]
    #[serial]
    fn test_auto_respects_no_color() {
        env::set_var("NO_COLOR", "");
        let config = OutputConfig::from_env_and_flag("auto");
        env::remove_var("NO_COLOR");
        assert_eq!(config, OutputConfig::uniform(false));
    }

    #[test]
    #[serial]
    fn test_always_overrides_no_color() {
        env::set_var("NO_COLOR", "1");
        let config = OutputConfig::from_env_and_flag("ALWAYS");
        env::remove_var("NO_COLOR");
        assert!(config.table_headers && config.status_markers);
    }

    #[test]
    fn test_summary_markers() {
        let plain = OutputConfig::uniform(false);
        assert_eq!(plain.marker(Marker::Merged), "[OK]");
        assert_eq!(plain.marker(Marker::Wrote), "[WRITE]");

        let fancy = OutputConfig::uniform(true);
        assert_eq!(fancy.marker(Marker::Merged), "✅");
        assert_eq!(fancy.marker(Marker::Wrote), "📝");
    }
}
