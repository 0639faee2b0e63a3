//! # Error Suggestions
//!
//! This module turns library errors into command-line errors that say what
//! went wrong AND how to fix it. Every [`Error`] kind gets its own hints.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use values_overlay::suggestions;
//!
//! let merged = options
//!     .merge_values(&providers)
//!     .map_err(suggestions::with_hint)?;
//! ```

use crate::defaults::{HTTP_TIMEOUT_ENV, STDIN_SENTINEL};
use crate::error::Error;
use crate::pipeline::Tier;

/// URL schemes the built-in retrieval understands.
const KNOWN_SCHEMES: [&str; 2] = ["http", "https"];

/// Wrap `error` in an `anyhow::Error` whose message ends with fix-it hints.
pub fn with_hint(error: Error) -> anyhow::Error {
    let hints = hints_for(&error);
    if hints.is_empty() {
        return anyhow::Error::new(error);
    }
    anyhow::anyhow!("{error}\n\n{}", hints.join("\n"))
}

fn hints_for(error: &Error) -> Vec<String> {
    match error {
        Error::Retrieval { reference, .. } => retrieval_hints(reference),
        Error::Traversal { .. } => vec![
            "hint: Check that every -d/--values-directory path exists and is a directory".to_string(),
            "hint: Remove or repair broken symlinks inside the directory".to_string(),
        ],
        Error::Format { tier: Tier::Json, .. } => vec![
            "hint: --set-json takes a JSON object ('{\"a\":1}') or key=<json> ('a.b=[1,2]')"
                .to_string(),
        ],
        Error::Format { .. } => vec![
            "hint: Each values document must be a YAML mapping of key: value pairs".to_string(),
            "hint: Separate several documents in one file with ---".to_string(),
        ],
        Error::AssignmentSyntax { tier, .. } => {
            let mut hints = vec![
                "hint: Write assignments as key=value, e.g. image.tag=1.2.3,servers[0].port=80"
                    .to_string(),
            ];
            if *tier == Tier::SetLiteral {
                hints.push("hint: --set-literal takes exactly one key=value per flag".to_string());
            } else {
                hints.push(
                    "hint: Escape commas, dots and brackets in values with \\, or use --set-literal"
                        .to_string(),
                );
            }
            hints
        }
        Error::Cluster { .. } => vec![
            "hint: --cluster-state must point to a YAML list of live objects".to_string(),
        ],
        Error::Manifest { .. } => vec![
            "hint: Every manifest document needs apiVersion, kind and metadata.name".to_string(),
        ],
        Error::Cancelled | Error::Io(_) | Error::Yaml(_) | Error::Json(_) => Vec::new(),
    }
}

fn retrieval_hints(reference: &str) -> Vec<String> {
    if reference.trim() == STDIN_SENTINEL {
        return vec![
            "hint: '-' reads standard input; pipe a document in, e.g. cat values.yaml | values-overlay merge -f -"
                .to_string(),
        ];
    }

    let mut hints = Vec::new();
    match reference.split_once("://") {
        Some((scheme, _)) if KNOWN_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str()) => {
            hints.push("hint: Check that the URL is reachable and returns the document".to_string());
            hints.push(format!(
                "hint: Raise the timeout with --http-timeout or {HTTP_TIMEOUT_ENV}"
            ));
        }
        Some((scheme, _)) => {
            if let Some(similar) = find_similar(&scheme.to_ascii_lowercase(), &KNOWN_SCHEMES) {
                hints.push(format!("hint: Did you mean '{similar}://'?"));
            }
            hints.push(format!(
                "hint: No getter handles '{scheme}://', so the reference was read as a local path"
            ));
        }
        None => {
            hints.push("hint: Check that the file exists and is readable".to_string());
        }
    }
    hints
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            if distance <= 2 && distance < input.len() {
                Some((candidate, distance))
            } else {
                None
            }
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Calculate the Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[b.len()]
}
