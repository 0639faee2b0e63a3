//! # Values Documents
//!
//! Conversion between raw bytes and the [`Values`] tree that every tier of the
//! pipeline folds into.
//!
//! A values tree is a `serde_yaml::Mapping` whose keys are always strings.
//! Documents are parsed as a YAML stream: several `---`-separated documents in
//! one file are deep-merged in order, and empty documents are skipped. Scalar
//! keys that are not strings (`1:`, `true:`) are stringified; sequence or
//! mapping keys are rejected. Merge keys (`<<: *anchor`) are expanded, with
//! the mapping's own keys taking precedence over the merged ones.
//!
//! Output is always key-sorted, so the same inputs produce byte-identical
//! results no matter what order the keys were inserted in.

use serde::Deserialize;
use serde_yaml::{Mapping, Value as YamlValue};
use thiserror::Error;

use crate::merge::{merge_into, type_name};

/// A configuration values tree.
pub type Values = Mapping;

/// Why a document could not be turned into a [`Values`] tree.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("error reading YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document {index} is a {kind}, expected a mapping")]
    NotAMapping { index: usize, kind: &'static str },

    #[error("unsupported {kind} key under {path:?}")]
    UnsupportedKey { path: String, kind: &'static str },
}

/// Parse a YAML stream into a values tree.
///
/// # Examples
///
/// ```
/// use values_overlay::values;
///
/// let values = values::parse(b"captain: luffy\n---\nship: Going Merry\n").unwrap();
/// assert_eq!(values.len(), 2);
/// ```
pub fn parse(bytes: &[u8]) -> Result<Values, DocumentError> {
    let mut values = Values::new();
    for (index, document) in serde_yaml::Deserializer::from_slice(bytes).enumerate() {
        let mut value = normalize_value(YamlValue::deserialize(document)?, "")?;
        value.apply_merge()?;
        match value {
            YamlValue::Null => continue,
            YamlValue::Mapping(map) => merge_into(&mut values, map),
            other => {
                return Err(DocumentError::NotAMapping {
                    index,
                    kind: type_name(&other),
                })
            }
        }
    }
    Ok(values)
}

/// Parse a JSON object into a values tree.
pub fn parse_json_object(text: &str) -> Result<Values, DocumentError> {
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
    Ok(object
        .into_iter()
        .map(|(key, value)| (YamlValue::String(key), from_json(value)))
        .collect())
}

/// Convert a JSON value into the equivalent YAML value.
pub fn from_json(value: serde_json::Value) -> YamlValue {
    match value {
        serde_json::Value::Null => YamlValue::Null,
        serde_json::Value::Bool(b) => YamlValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                YamlValue::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                YamlValue::Number(u.into())
            } else {
                YamlValue::Number(n.as_f64().unwrap_or_default().into())
            }
        }
        serde_json::Value::String(s) => YamlValue::String(s),
        serde_json::Value::Array(items) => {
            YamlValue::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(object) => YamlValue::Mapping(
            object
                .into_iter()
                .map(|(key, value)| (YamlValue::String(key), from_json(value)))
                .collect(),
        ),
    }
}

/// Serialize a values tree as key-sorted YAML.
pub fn to_yaml_string(values: &Values) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(&YamlValue::Mapping(sorted(values)))
}

/// Serialize a values tree as key-sorted, pretty-printed JSON.
pub fn to_json_string(values: &Values) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(&YamlValue::Mapping(sorted(values)))?;
    json.push('\n');
    Ok(json)
}

/// Return a copy of `values` with the keys of every mapping sorted.
pub fn sorted(values: &Values) -> Values {
    let mut entries: Vec<(&YamlValue, &YamlValue)> = values.iter().collect();
    entries.sort_by(|(a, _), (b, _)| key_str(a).cmp(key_str(b)));
    entries
        .into_iter()
        .map(|(key, value)| (key.clone(), sorted_value(value)))
        .collect()
}

fn sorted_value(value: &YamlValue) -> YamlValue {
    match value {
        YamlValue::Mapping(map) => YamlValue::Mapping(sorted(map)),
        YamlValue::Sequence(items) => YamlValue::Sequence(items.iter().map(sorted_value).collect()),
        other => other.clone(),
    }
}

fn key_str(key: &YamlValue) -> &str {
    key.as_str().unwrap_or_default()
}

fn normalize_mapping(map: Mapping, path: &str) -> Result<Values, DocumentError> {
    let mut out = Values::new();
    for (key, value) in map {
        let key = match key {
            YamlValue::String(s) => s,
            YamlValue::Bool(b) => b.to_string(),
            YamlValue::Number(n) => n.to_string(),
            YamlValue::Null => "null".to_string(),
            other => {
                return Err(DocumentError::UnsupportedKey {
                    path: path.to_string(),
                    kind: type_name(&other),
                })
            }
        };
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", path, key)
        };
        out.insert(YamlValue::String(key), normalize_value(value, &child_path)?);
    }
    Ok(out)
}

fn normalize_value(value: YamlValue, path: &str) -> Result<YamlValue, DocumentError> {
    match value {
        YamlValue::Mapping(map) => Ok(YamlValue::Mapping(normalize_mapping(map, path)?)),
        YamlValue::Sequence(items) => Ok(YamlValue::Sequence(
            items
                .into_iter()
                .map(|item| normalize_value(item, path))
                .collect::<Result<_, _>>()?,
        )),
        YamlValue::Tagged(tagged) => normalize_value(tagged.value, path),
        scalar => Ok(scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> YamlValue {
        YamlValue::String(s.to_string())
    }

    #[test]
    fn test_parse_simple_mapping() {
        let values = parse(b"captain: luffy\nbounty: 3000000000\n").unwrap();
        assert_eq!(values.get(key("captain")), Some(&key("luffy")));
        assert_eq!(
            values.get(key("bounty")),
            Some(&YamlValue::Number(3000000000i64.into()))
        );
    }

    #[test]
    fn test_parse_empty_input_is_empty_mapping() {
        assert!(parse(b"").unwrap().is_empty());
        assert!(parse(b"# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_merges_documents_in_order() {
        let values = parse(b"ship: Going Merry\ncrew:\n  cook: Sanji\n---\nship: Thousand Sunny\ncrew:\n  doctor: Chopper\n").unwrap();
        assert_eq!(values.get(key("ship")), Some(&key("Thousand Sunny")));
        let crew = values.get(key("crew")).unwrap().as_mapping().unwrap();
        assert_eq!(crew.len(), 2);
    }

    #[test]
    fn test_parse_skips_empty_documents() {
        let values = parse(b"---\n---\na: 1\n---\n").unwrap();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_parse_expands_merge_keys() {
        let values = parse(b"base: &base\n  image: nginx\n  tag: '1'\nprod:\n  <<: *base\n  tag: '2'\n").unwrap();
        let prod = values.get(key("prod")).unwrap().as_mapping().unwrap();
        assert!(!prod.contains_key(key("<<")));
        assert_eq!(prod.get(key("image")), Some(&key("nginx")));
        assert_eq!(prod.get(key("tag")), Some(&key("2")));
    }

    #[test]
    fn test_parse_expands_merge_keys_under_tagged_document() {
        let values = parse(b"!values {base: &base {a: 1}, copy: {<<: [*base]}}\n").unwrap();
        let copy = values.get(key("copy")).unwrap().as_mapping().unwrap();
        assert_eq!(copy.get(key("a")), Some(&YamlValue::Number(1.into())));
        assert!(!copy.contains_key(key("<<")));
    }

    #[test]
    fn test_parse_rejects_scalar_merge_value() {
        let err = parse(b"a:\n  <<: 5\n").unwrap_err();
        assert!(matches!(err, DocumentError::Yaml(_)));
    }

    #[test]
    fn test_parse_rejects_top_level_sequence() {
        let err = parse(b"- a\n- b\n").unwrap_err();
        assert!(matches!(err, DocumentError::NotAMapping { index: 0, kind: "Sequence" }));
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        let err = parse(b"invalid: [yaml: {broken").unwrap_err();
        assert!(matches!(err, DocumentError::Yaml(_)));
    }

    #[test]
    fn test_parse_stringifies_scalar_keys() {
        let values = parse(b"1: one\ntrue: yes\nnested:\n  2: two\n").unwrap();
        assert!(values.contains_key(key("1")));
        assert!(values.contains_key(key("true")));
        let nested = values.get(key("nested")).unwrap().as_mapping().unwrap();
        assert!(nested.contains_key(key("2")));
    }

    #[test]
    fn test_parse_rejects_sequence_keys() {
        let err = parse(b"outer:\n  ? [a, b]\n  : value\n").unwrap_err();
        match err {
            DocumentError::UnsupportedKey { path, kind } => {
                assert_eq!(path, "outer");
                assert_eq!(kind, "Sequence");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_json_object() {
        let values = parse_json_object(r#"{"a": {"b": [1, 2.5, "x", null, true]}}"#).unwrap();
        let b = values.get(key("a")).unwrap().get("b").unwrap();
        let items = b.as_sequence().unwrap();
        assert_eq!(items[0], YamlValue::Number(1.into()));
        assert_eq!(items[1], YamlValue::Number(2.5.into()));
        assert_eq!(items[3], YamlValue::Null);
        assert_eq!(items[4], YamlValue::Bool(true));
    }

    #[test]
    fn test_parse_json_object_rejects_non_object() {
        assert!(matches!(parse_json_object("[1, 2]"), Err(DocumentError::Json(_))));
        assert!(matches!(parse_json_object("{\"a\": "), Err(DocumentError::Json(_))));
    }

    #[test]
    fn test_to_yaml_string_sorts_keys() {
        let values = parse(b"zeta: 1\nalpha:\n  y: 2\n  x: 1\n").unwrap();
        let out = to_yaml_string(&values).unwrap();
        assert_eq!(out, "alpha:\n  x: 1\n  y: 2\nzeta: 1\n");
    }

    #[test]
    fn test_to_json_string_sorts_keys() {
        let values = parse(b"b: 2\na: 1\n").unwrap();
        let out = to_json_string(&values).unwrap();
        assert_eq!(out, "{\n  \"a\": 1,\n  \"b\": 2\n}\n");
    }
}
