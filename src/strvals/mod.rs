//! # Inline Assignments
//!
//! Applies flat `key=value` assignment strings directly to a values tree.
//!
//! ## Grammar
//!
//! An assignment string is a comma-separated list of `key=value` pairs.
//! Keys are dot-separated names; `name[N]` addresses a list element and
//! `name[N][M]` nests lists. A backslash escapes the next character in both
//! keys and values.
//!
//! ```text
//! image.tag=1.2.3,replicas=3
//! servers[0].port=80,servers[0].host=example.com
//! tolerations={a,b,c}
//! note=one\,two
//! ```
//!
//! Missing intermediate mappings and lists are created. An existing value of
//! the wrong shape along the path is replaced. List indices are capped at
//! [`MAX_INDEX`](crate::defaults::MAX_INDEX) and key nesting at
//! [`MAX_NESTED_NAME_LEVEL`](crate::defaults::MAX_NESTED_NAME_LEVEL).
//!
//! ## Modes
//!
//! - [`parse_into`]: scalars are typed (see [`typed_value`]).
//! - [`parse_into_string`]: every scalar is a string.
//! - [`parse_into_file`]: every value is a file reference whose content
//!   becomes a string.
//! - [`parse_json`]: every value is one JSON document, which may itself
//!   contain commas.
//! - [`parse_literal_into`]: a single assignment with no escapes, whose value
//!   is everything after the first `=`.

mod literal;
mod parser;

use serde_yaml::Value as YamlValue;
use thiserror::Error;

use crate::defaults::{MAX_INDEX, MAX_NESTED_NAME_LEVEL};
use crate::values::Values;

use literal::LiteralParser;
use parser::{Mode, Parser};

/// Why an assignment string could not be applied.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("key {key:?} has no value")]
    NoValue { key: String },

    #[error("key {key:?} has no value (cannot end with ,)")]
    NoValueBeforeComma { key: String },

    #[error("key map {key:?} has no value")]
    EmptyMap { key: String },

    #[error("list must terminate with '}}'")]
    UnterminatedList,

    #[error("error parsing index: missing ']'")]
    UnterminatedIndex,

    #[error("error parsing index: {raw:?} is not an integer")]
    InvalidIndex { raw: String },

    #[error("negative {index} index not allowed")]
    NegativeIndex { index: i64 },

    #[error("index of {index} is greater than maximum supported index of {}", MAX_INDEX)]
    IndexTooLarge { index: i64 },

    #[error(
        "value name nested level is greater than maximum supported nested level of {}",
        MAX_NESTED_NAME_LEVEL
    )]
    NestingTooDeep,

    #[error("unexpected data at end of array index: {data:?}")]
    UnexpectedData { data: String },

    #[error("unexpected end of input after array index")]
    UnexpectedEnd,

    #[error("unexpected {token:?}")]
    UnexpectedToken { token: char },

    #[error("invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {reference}: {source}")]
    ReadFile {
        reference: String,
        #[source]
        source: Box<crate::error::Error>,
    },
}

/// Applies flat assignments to a values tree in place.
///
/// The pipeline talks to this trait rather than to the free functions, so a
/// different assignment syntax can be plugged in.
pub trait Assigner {
    /// `--set`: typed scalars.
    fn set(&self, assignment: &str, target: &mut Values) -> Result<(), ParseError>;

    /// `--set-string`: every scalar is a string.
    fn set_string(&self, assignment: &str, target: &mut Values) -> Result<(), ParseError>;

    /// `--set-json`: every value is a JSON document.
    fn set_json(&self, assignment: &str, target: &mut Values) -> Result<(), ParseError>;

    /// `--set-literal`: one assignment, value taken verbatim.
    fn set_literal(&self, assignment: &str, target: &mut Values) -> Result<(), ParseError>;

    /// `--set-file`: every value names a file read through `read_file`.
    fn set_file(
        &self,
        assignment: &str,
        target: &mut Values,
        read_file: &mut dyn FnMut(&str) -> crate::error::Result<Vec<u8>>,
    ) -> Result<(), ParseError>;
}

/// The dotted-path [`Assigner`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DottedAssigner;

impl Assigner for DottedAssigner {
    fn set(&self, assignment: &str, target: &mut Values) -> Result<(), ParseError> {
        parse_into(assignment, target)
    }

    fn set_string(&self, assignment: &str, target: &mut Values) -> Result<(), ParseError> {
        parse_into_string(assignment, target)
    }

    fn set_json(&self, assignment: &str, target: &mut Values) -> Result<(), ParseError> {
        parse_json(assignment, target)
    }

    fn set_literal(&self, assignment: &str, target: &mut Values) -> Result<(), ParseError> {
        parse_literal_into(assignment, target)
    }

    fn set_file(
        &self,
        assignment: &str,
        target: &mut Values,
        read_file: &mut dyn FnMut(&str) -> crate::error::Result<Vec<u8>>,
    ) -> Result<(), ParseError> {
        parse_into_file(assignment, target, read_file)
    }
}

/// Parse an assignment string into a fresh tree.
///
/// # Examples
///
/// ```
/// use values_overlay::strvals;
///
/// let values = strvals::parse("image.tag=1.2.3,replicas=3").unwrap();
/// assert_eq!(values["image"]["tag"].as_str(), Some("1.2.3"));
/// assert_eq!(values["replicas"].as_i64(), Some(3));
/// ```
pub fn parse(assignment: &str) -> Result<Values, ParseError> {
    let mut values = Values::new();
    parse_into(assignment, &mut values)?;
    Ok(values)
}

/// Apply `assignment` to `dest` with typed scalars.
pub fn parse_into(assignment: &str, dest: &mut Values) -> Result<(), ParseError> {
    Parser::new(assignment, Mode::Typed).parse(dest)
}

/// Apply `assignment` to `dest`, keeping every scalar as a string.
pub fn parse_into_string(assignment: &str, dest: &mut Values) -> Result<(), ParseError> {
    Parser::new(assignment, Mode::Strings).parse(dest)
}

/// Apply `assignment` to `dest`, decoding every value as JSON.
///
/// An empty value sets null.
pub fn parse_json(assignment: &str, dest: &mut Values) -> Result<(), ParseError> {
    Parser::new(assignment, Mode::Json).parse(dest)
}

/// Apply `assignment` to `dest`, replacing every value with the content
/// `read_file` returns for it.
pub fn parse_into_file(
    assignment: &str,
    dest: &mut Values,
    read_file: &mut dyn FnMut(&str) -> crate::error::Result<Vec<u8>>,
) -> Result<(), ParseError> {
    Parser::new(assignment, Mode::File(read_file)).parse(dest)
}

/// Apply a single literal assignment to `dest`.
pub fn parse_literal_into(assignment: &str, dest: &mut Values) -> Result<(), ParseError> {
    LiteralParser::new(assignment).parse(dest)
}

/// Type a raw `--set` scalar.
///
/// `true`, `false` and `null` (any case) become bool and null. `0` and
/// decimal integers without a leading zero become integers. Anything else,
/// including `007` and `1.5`, stays a string.
pub fn typed_value(raw: &str) -> YamlValue {
    if raw.eq_ignore_ascii_case("true") {
        return YamlValue::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return YamlValue::Bool(false);
    }
    if raw.eq_ignore_ascii_case("null") {
        return YamlValue::Null;
    }
    if raw == "0" {
        return YamlValue::Number(0.into());
    }
    if !raw.is_empty() && !raw.starts_with('0') {
        if let Ok(n) = raw.parse::<i64>() {
            return YamlValue::Number(n.into());
        }
    }
    YamlValue::String(raw.to_string())
}
