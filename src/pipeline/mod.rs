//! # Precedence Pipeline
//!
//! Folds every configured values source into one tree.
//!
//! ## Overview
//!
//! Sources are applied in fixed tier order, each tier's entries in the order
//! the caller gave them:
//!
//! 1. Values directories - every `.yaml` file below each directory, listed
//!    lexicographically
//! 2. Named values files - appended after all directory files
//! 3. JSON payloads - an object is deep-merged, anything else is a
//!    `key=<json>` assignment
//! 4. `--set`, `--set-string`, `--set-file`, `--set-literal` - applied in
//!    place on the accumulated tree
//!
//! Tree tiers are parsed and deep-merged with [`merge_into`]; later sources
//! win on conflicts and nested mappings are combined. Flat tiers always run
//! after every tree tier, so an assignment overrides any document.
//!
//! The first failure aborts the whole call; no partially merged tree is
//! returned.

mod tier;

pub use tier::Tier;

use std::path::Path;

use log::{debug, info};

use crate::cancel::CancelToken;
use crate::defaults::VALUES_EXTENSION;
use crate::error::{Error, Result};
use crate::filesystem::list_files_recursive;
use crate::getter::Providers;
use crate::merge::merge_into;
use crate::source::SourceReader;
use crate::strvals::{Assigner, DottedAssigner, ParseError};
use crate::values::{self, Values};

/// The values sources for one merge, grouped by tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueOptions {
    /// Directories whose `.yaml` files are merged (`-d`).
    pub values_directories: Vec<String>,
    /// Documents to merge: paths, URLs or `-` (`-f`).
    pub value_files: Vec<String>,
    /// JSON objects or `key=<json>` assignments (`--set-json`).
    pub json_values: Vec<String>,
    /// Typed assignments (`--set`).
    pub values: Vec<String>,
    /// String assignments (`--set-string`).
    pub string_values: Vec<String>,
    /// Assignments whose values are file references (`--set-file`).
    pub file_values: Vec<String>,
    /// Literal assignments (`--set-literal`).
    pub literal_values: Vec<String>,
}

impl ValueOptions {
    /// The entries configured for `tier`.
    pub fn entries(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Directories => &self.values_directories,
            Tier::ValueFiles => &self.value_files,
            Tier::Json => &self.json_values,
            Tier::Set => &self.values,
            Tier::SetString => &self.string_values,
            Tier::SetFile => &self.file_values,
            Tier::SetLiteral => &self.literal_values,
        }
    }

    /// Whether no source is configured at all.
    pub fn is_empty(&self) -> bool {
        Tier::ALL.iter().all(|tier| self.entries(*tier).is_empty())
    }

    /// Merge every source using `providers` for URL references, the process's
    /// standard input for `-`, and the dotted assignment syntax.
    ///
    /// # Examples
    ///
    /// ```
    /// use values_overlay::getter::Providers;
    /// use values_overlay::pipeline::ValueOptions;
    ///
    /// let options = ValueOptions {
    ///     values: vec!["crew.captain=Luffy,crew.size=9".to_string()],
    ///     string_values: vec!["crew.size=10".to_string()],
    ///     ..Default::default()
    /// };
    /// let merged = options.merge_values(&Providers::new()).unwrap();
    /// assert_eq!(merged["crew"]["captain"].as_str(), Some("Luffy"));
    /// assert_eq!(merged["crew"]["size"].as_str(), Some("10"));
    /// ```
    pub fn merge_values(&self, providers: &Providers) -> Result<Values> {
        let reader = SourceReader::new(providers);
        self.merge_values_with(&reader, &DottedAssigner, &CancelToken::new())
    }

    /// Merge every source through explicit collaborators.
    ///
    /// `cancel` is polled before each directory, document and assignment.
    ///
    /// # Errors
    ///
    /// - `Error::Traversal` if a values directory cannot be listed
    /// - `Error::Retrieval` if a document or `--set-file` reference cannot be
    ///   read
    /// - `Error::Format` if a document or JSON object does not parse
    /// - `Error::AssignmentSyntax` if an assignment is malformed
    /// - `Error::Cancelled` if `cancel` fires
    pub fn merge_values_with<A: Assigner + ?Sized>(
        &self,
        reader: &SourceReader<'_>,
        assigner: &A,
        cancel: &CancelToken,
    ) -> Result<Values> {
        check_cancelled(cancel)?;

        let mut base = Values::new();
        let mut sources = 0;

        for (tier, reference) in self.documents(cancel)? {
            check_cancelled(cancel)?;
            let bytes = reader.read(&reference)?;
            let document = values::parse(&bytes).map_err(|err| Error::Format {
                tier,
                source_id: reference.clone(),
                message: err.to_string(),
            })?;
            debug!("Merging {} ({}, {} key(s))", reference, tier, document.len());
            merge_into(&mut base, document);
            sources += 1;
        }

        sources += self.apply_json(&mut base, assigner, cancel)?;

        sources += apply_flat(Tier::Set, &self.values, &mut base, cancel, |entry, base| {
            assigner.set(entry, base)
        })?;
        sources += apply_flat(
            Tier::SetString,
            &self.string_values,
            &mut base,
            cancel,
            |entry, base| assigner.set_string(entry, base),
        )?;
        sources += apply_flat(
            Tier::SetFile,
            &self.file_values,
            &mut base,
            cancel,
            |entry, base| {
                assigner.set_file(entry, base, &mut |reference: &str| reader.read(reference))
            },
        )?;
        sources += apply_flat(
            Tier::SetLiteral,
            &self.literal_values,
            &mut base,
            cancel,
            |entry, base| assigner.set_literal(entry, base),
        )?;

        info!(
            "Merged {} source(s) into {} top-level key(s)",
            sources,
            base.len()
        );
        Ok(base)
    }

    /// The working document list: every directory's files, then the named
    /// documents.
    fn documents(&self, cancel: &CancelToken) -> Result<Vec<(Tier, String)>> {
        let mut documents = Vec::new();

        if !self.values_directories.is_empty() {
            debug!(
                "Listing {} values director(ies)",
                self.values_directories.len()
            );
        }
        for directory in &self.values_directories {
            check_cancelled(cancel)?;
            let files = list_files_recursive(Path::new(directory), Some(VALUES_EXTENSION))?;
            debug!("{}: {} values file(s)", directory, files.len());
            documents.extend(
                files
                    .into_iter()
                    .map(|path| (Tier::Directories, path.to_string_lossy().into_owned())),
            );
        }

        documents.extend(
            self.value_files
                .iter()
                .map(|file| (Tier::ValueFiles, file.clone())),
        );
        Ok(documents)
    }

    fn apply_json<A: Assigner + ?Sized>(
        &self,
        base: &mut Values,
        assigner: &A,
        cancel: &CancelToken,
    ) -> Result<usize> {
        if self.json_values.is_empty() {
            return Ok(0);
        }
        debug!("Applying {} {} entries", self.json_values.len(), Tier::Json);

        for value in &self.json_values {
            check_cancelled(cancel)?;
            let trimmed = value.trim();
            if trimmed.starts_with('{') {
                let object = values::parse_json_object(trimmed).map_err(|err| Error::Format {
                    tier: Tier::Json,
                    source_id: value.clone(),
                    message: err.to_string(),
                })?;
                merge_into(base, object);
            } else {
                assigner
                    .set_json(value, base)
                    .map_err(|source| match source {
                        ParseError::Json(err) => Error::Format {
                            tier: Tier::Json,
                            source_id: value.clone(),
                            message: err.to_string(),
                        },
                        source => assignment_error(Tier::Json, value, source),
                    })?;
            }
        }
        Ok(self.json_values.len())
    }
}

/// Apply every entry of one flat tier in order.
fn apply_flat<F>(
    tier: Tier,
    entries: &[String],
    base: &mut Values,
    cancel: &CancelToken,
    mut assign: F,
) -> Result<usize>
where
    F: FnMut(&str, &mut Values) -> std::result::Result<(), ParseError>,
{
    if entries.is_empty() {
        return Ok(0);
    }
    debug!("Applying {} {} entries", entries.len(), tier);

    for entry in entries {
        check_cancelled(cancel)?;
        assign(entry, base).map_err(|source| assignment_error(tier, entry, source))?;
    }
    Ok(entries.len())
}

fn assignment_error(tier: Tier, entry: &str, source: ParseError) -> Error {
    Error::AssignmentSyntax {
        tier,
        entry: entry.to_string(),
        source,
    }
}

fn check_cancelled(cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }
    Ok(())
}
