//! Precedence tiers.

use std::fmt;

/// One class of values source. Later tiers override earlier ones.
///
/// The derived ordering is the precedence order, so
/// `Tier::Directories < Tier::SetLiteral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Directories of `.yaml` documents.
    Directories,
    /// Individually named documents.
    ValueFiles,
    /// Raw JSON payloads.
    Json,
    /// Typed inline assignments.
    Set,
    /// String inline assignments.
    SetString,
    /// File-content inline assignments.
    SetFile,
    /// Literal inline assignments.
    SetLiteral,
}

impl Tier {
    /// Every tier, in the order the pipeline applies them.
    pub const ALL: [Tier; 7] = [
        Tier::Directories,
        Tier::ValueFiles,
        Tier::Json,
        Tier::Set,
        Tier::SetString,
        Tier::SetFile,
        Tier::SetLiteral,
    ];

    /// Precedence rank, 1 (lowest) through 7 (highest).
    pub fn rank(self) -> u8 {
        match self {
            Tier::Directories => 1,
            Tier::ValueFiles => 2,
            Tier::Json => 3,
            Tier::Set => 4,
            Tier::SetString => 5,
            Tier::SetFile => 6,
            Tier::SetLiteral => 7,
        }
    }

    /// The command-line flag that feeds this tier.
    pub fn flag(self) -> &'static str {
        match self {
            Tier::Directories => "--values-directory",
            Tier::ValueFiles => "--values",
            Tier::Json => "--set-json",
            Tier::Set => "--set",
            Tier::SetString => "--set-string",
            Tier::SetFile => "--set-file",
            Tier::SetLiteral => "--set-literal",
        }
    }

    /// Whether the tier applies assignments in place rather than merging
    /// parsed documents.
    pub fn is_flat(self) -> bool {
        self >= Tier::Set
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}
