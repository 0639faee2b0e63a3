//! Property-based tests for the deep merge.
//!
//! These tests use proptest to generate random values trees and verify that
//! the merge invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::merge::{merge_into, merge_maps};
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value as YamlValue};

    /// Leaf values: every scalar kind a parsed document can contain.
    fn leaf() -> impl Strategy<Value = YamlValue> {
        prop_oneof![
            Just(YamlValue::Null),
            any::<bool>().prop_map(YamlValue::Bool),
            any::<i64>().prop_map(|n| YamlValue::Number(n.into())),
            "[a-z]{0,6}".prop_map(YamlValue::String),
        ]
    }

    /// Arbitrary values nested a few levels deep.
    ///
    /// Keys come from a tiny alphabet so that base and overlay collide often.
    fn value() -> impl Strategy<Value = YamlValue> {
        leaf().prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(YamlValue::Sequence),
                prop::collection::vec(("[a-c]{1,2}", inner), 0..4).prop_map(|entries| {
                    YamlValue::Mapping(
                        entries
                            .into_iter()
                            .map(|(k, v)| (YamlValue::String(k), v))
                            .collect(),
                    )
                }),
            ]
        })
    }

    fn mapping() -> impl Strategy<Value = Mapping> {
        prop::collection::vec(("[a-c]{1,2}", value()), 0..5).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (YamlValue::String(k), v))
                .collect()
        })
    }

    proptest! {
        /// Property: merging a tree with itself yields the same tree
        #[test]
        fn merge_is_idempotent(x in mapping()) {
            prop_assert_eq!(merge_maps(&x, &x), x);
        }

        /// Property: every non-mapping overlay value survives unchanged
        #[test]
        fn merge_is_right_biased_on_non_mappings(base in mapping(), overlay in mapping()) {
            let merged = merge_maps(&base, &overlay);
            for (key, value) in &overlay {
                if !value.is_mapping() {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
        }

        /// Property: keys missing from the overlay keep their base value
        #[test]
        fn merge_preserves_base_only_keys(base in mapping(), overlay in mapping()) {
            let merged = merge_maps(&base, &overlay);
            for (key, value) in &base {
                if !overlay.contains_key(key) {
                    prop_assert_eq!(merged.get(key), Some(value));
                }
            }
        }

        /// Property: the merged key set is exactly the union of both key sets
        #[test]
        fn merge_key_set_is_union(base in mapping(), overlay in mapping()) {
            let merged = merge_maps(&base, &overlay);
            for key in merged.keys() {
                prop_assert!(base.contains_key(key) || overlay.contains_key(key));
            }
            prop_assert!(merged.len() >= base.len().max(overlay.len()));
        }

        /// Property: merging into an empty tree yields the overlay
        #[test]
        fn merge_onto_empty_is_overlay(overlay in mapping()) {
            prop_assert_eq!(merge_maps(&Mapping::new(), &overlay), overlay);
        }

        /// Property: the pure and in-place forms agree and inputs are untouched
        #[test]
        fn merge_forms_agree(base in mapping(), overlay in mapping()) {
            let base_before = base.clone();
            let overlay_before = overlay.clone();
            let pure = merge_maps(&base, &overlay);
            prop_assert_eq!(&base, &base_before);
            prop_assert_eq!(&overlay, &overlay_before);

            let mut in_place = base.clone();
            merge_into(&mut in_place, overlay);
            prop_assert_eq!(in_place, pure);
        }
    }
}
