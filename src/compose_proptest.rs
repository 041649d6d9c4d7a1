//! Property-based tests for overlay composition and path rewriting.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use std::path::Path;

    use crate::compose::apply_overlays;
    use crate::merge::{merge_yaml_values, ArrayMergeMode};
    use crate::path::{normalize, PathContext};
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value as YamlValue};

    fn sequence(items: &[String]) -> YamlValue {
        YamlValue::Sequence(items.iter().map(|s| YamlValue::from(s.as_str())).collect())
    }

    fn single(key: &str, value: YamlValue) -> Mapping {
        let mut map = Mapping::new();
        map.insert(YamlValue::from(key), value);
        map
    }

    // ============================================================================
    // overlay merge property tests
    // ============================================================================

    proptest! {
        /// Property: appending overlays concatenates arrays, base items first
        #[test]
        fn append_concatenates_in_order(
            base in prop::collection::vec("[a-z]{1,8}", 0..6),
            overlay in prop::collection::vec("[a-z]{1,8}", 0..6),
        ) {
            let base_map = single("environment", sequence(&base));
            let overlay_map = single("environment", sequence(&overlay));

            let merged = apply_overlays("svc", &base_map, &["o"], |_| Some(&overlay_map)).unwrap();

            let expected: Vec<String> = base.iter().chain(overlay.iter()).cloned().collect();
            prop_assert_eq!(merged, single("environment", sequence(&expected)));
        }

        /// Property: a reset marker makes earlier overlays irrelevant
        #[test]
        fn reset_discards_previous_overlays(
            base in prop::collection::vec("[a-z]{1,8}", 0..4),
            first in prop::collection::vec("[a-z]{1,8}", 0..4),
            last in prop::collection::vec("[a-z]{1,8}", 0..4),
        ) {
            let base_map = single("ports", sequence(&base));
            let first_map = single("ports", sequence(&first));
            let last_map = single("ports", sequence(&last));
            let lookup = |name: &str| match name {
                "first" => Some(&first_map),
                "last" => Some(&last_map),
                _ => None,
            };

            let reset = apply_overlays("svc", &base_map, &["first", "-last"], lookup).unwrap();
            let alone = apply_overlays("svc", &Mapping::new(), &["last"], lookup).unwrap();
            prop_assert_eq!(reset, alone);
        }

        /// Property: merging a mapping into an empty mapping yields the mapping
        #[test]
        fn merge_into_empty_is_identity(
            keys in prop::collection::btree_set("[a-z]{1,6}", 0..6),
            mode in prop_oneof![Just(ArrayMergeMode::Append), Just(ArrayMergeMode::Replace)],
        ) {
            let source: Mapping = keys
                .iter()
                .map(|k| (YamlValue::from(k.as_str()), YamlValue::from(k.len() as u64)))
                .collect();
            let mut target = YamlValue::Mapping(Mapping::new());
            merge_yaml_values(&mut target, &YamlValue::Mapping(source.clone()), mode, "");
            prop_assert_eq!(target, YamlValue::Mapping(source));
        }
    }

    // ============================================================================
    // path property tests
    // ============================================================================

    proptest! {
        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(segments in prop::collection::vec("(\\.|\\.\\.|[a-z]{1,5})", 0..8)) {
            let path = format!("/{}", segments.join("/"));
            let once = normalize(Path::new(&path));
            let twice = normalize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: resolved relative paths always start with a dot
        #[test]
        fn resolved_paths_start_with_dot(
            dir in prop::collection::vec("[a-z]{1,5}", 0..4),
            rel in prop::collection::vec("[a-z]{1,5}", 1..4),
        ) {
            let ctx = PathContext::new("/proj").with_home_dir(None);
            let fragment_dir = Path::new("/proj").join(dir.join("/"));
            let resolved = ctx.resolve(&format!("./{}", rel.join("/")), &fragment_dir);
            prop_assert!(resolved.starts_with('.'), "{} should start with '.'", resolved);
        }

        /// Property: values that are not paths pass through unchanged
        #[test]
        fn non_path_values_unchanged(value in "[a-z][a-z0-9_:/-]{0,20}") {
            let ctx = PathContext::new("/proj").with_home_dir(None);
            prop_assert_eq!(ctx.resolve(&value, Path::new("/proj/sub")), value);
        }
    }
}
