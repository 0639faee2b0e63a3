//! Deep merge of values trees
//!
//! Every tree-shaped tier of the pipeline is folded into the accumulator
//! through this module:
//!
//! - Two mappings at the same key merge key by key, recursively.
//! - Anything else at a key (scalar, sequence, or a mapping meeting a
//!   non-mapping) is replaced wholesale by the overlay's value.
//!
//! Sequences are never merged element-wise. A later list always replaces an
//! earlier one.
//!
//! ## Example
//!
//! ```
//! use values_overlay::merge::merge_maps;
//! use values_overlay::values;
//!
//! let base = values::parse(b"a:\n  x: 1\n  y: 2\n").unwrap();
//! let overlay = values::parse(b"a:\n  y: 3\n").unwrap();
//! let merged = merge_maps(&base, &overlay);
//! assert_eq!(values::to_yaml_string(&merged).unwrap(), "a:\n  x: 1\n  y: 3\n");
//! ```

use log::trace;
use serde_yaml::{Mapping, Value as YamlValue};

/// Merge `overlay` on top of `base`, returning a new tree.
///
/// Neither input is modified. Keys present only in `base` are kept, keys
/// present in `overlay` win, and nested mappings on both sides are merged
/// recursively.
pub fn merge_maps(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut out = base.clone();
    merge_into(&mut out, overlay.clone());
    out
}

/// Merge `overlay` into `target` in place.
///
/// This is the owning form of [`merge_maps`]; the result is identical.
pub fn merge_into(target: &mut Mapping, overlay: Mapping) {
    merge_at(target, overlay, "");
}

fn merge_at(target: &mut Mapping, overlay: Mapping, path: &str) {
    for (key, value) in overlay {
        let key_path = child_path(path, &key);

        match (target.get_mut(&key), value) {
            (Some(YamlValue::Mapping(existing)), YamlValue::Mapping(incoming)) => {
                merge_at(existing, incoming, &key_path);
            }
            (Some(existing), incoming) => {
                trace!(
                    "Overriding value at '{}': {} -> {}",
                    key_path,
                    type_name(existing),
                    type_name(&incoming)
                );
                *existing = incoming;
            }
            (None, incoming) => {
                target.insert(key, incoming);
            }
        }
    }
}

fn child_path(path: &str, key: &YamlValue) -> String {
    let key_str = match key {
        YamlValue::String(s) => s.clone(),
        other => format!("{:?}", other),
    };
    if path.is_empty() {
        key_str
    } else {
        format!("{}.{}", path, key_str)
    }
}

/// Get a human-readable type name for a YAML value
///
/// Used for logging and error messages to describe the type of a value.
pub fn type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "Null",
        YamlValue::Bool(_) => "Bool",
        YamlValue::Number(_) => "Number",
        YamlValue::String(_) => "String",
        YamlValue::Sequence(_) => "Sequence",
        YamlValue::Mapping(_) => "Mapping",
        YamlValue::Tagged(_) => "Tagged",
    }
}
