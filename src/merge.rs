//! Deep merging of YAML values
//!
//! Two merges happen while building a compose document:
//!
//! - overlays are merged into a service with [`ArrayMergeMode::Append`], so
//!   list fields such as `environment` or `volumes` accumulate;
//! - top-level `volumes` and `networks` of successive fragments are merged
//!   with [`ArrayMergeMode::Replace`], the later fragment winning.
//!
//! Mappings always merge key by key. In append mode an existing sequence
//! also absorbs a non-sequence source value as one more item. Any other
//! conflict is resolved in favor of the source value.

use log::trace;
use serde_yaml::{Mapping, Value as YamlValue};

/// How to combine two sequences found at the same key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayMergeMode {
    /// Target items first, then source items
    Append,
    /// Source sequence replaces the target sequence
    Replace,
}

/// Recursively merge `source` into `target`.
///
/// `path` is the dotted location of `target`, used for trace logging only.
pub fn merge_yaml_values(
    target: &mut YamlValue,
    source: &YamlValue,
    mode: ArrayMergeMode,
    path: &str,
) {
    match (target, source) {
        (YamlValue::Mapping(target_map), YamlValue::Mapping(source_map)) => {
            merge_mappings(target_map, source_map, mode, path);
        }
        (YamlValue::Sequence(target_seq), source) if mode == ArrayMergeMode::Append => {
            match source {
                YamlValue::Sequence(source_seq) => {
                    trace!(
                        "Appending {} item(s) at '{}' ({} existing)",
                        source_seq.len(),
                        path,
                        target_seq.len()
                    );
                    target_seq.extend(source_seq.iter().cloned());
                }
                // An existing sequence absorbs a single overlay value
                item => {
                    trace!(
                        "Appending {} at '{}' ({} existing)",
                        get_yaml_type_name(item),
                        path,
                        target_seq.len()
                    );
                    target_seq.push(item.clone());
                }
            }
        }
        (target, source) => {
            if !target.is_null() && *target != *source {
                trace!(
                    "Overwriting {} at '{}' with {}",
                    get_yaml_type_name(target),
                    path,
                    get_yaml_type_name(source)
                );
            }
            *target = source.clone();
        }
    }
}

/// Merge every key of `source` into `target`, see [`merge_yaml_values`].
pub fn merge_mappings(target: &mut Mapping, source: &Mapping, mode: ArrayMergeMode, path: &str) {
    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) => {
                let key_str = match key {
                    YamlValue::String(s) => s.clone(),
                    _ => format!("{:?}", key),
                };
                let new_path = if path.is_empty() {
                    key_str
                } else {
                    format!("{}.{}", path, key_str)
                };
                merge_yaml_values(existing, value, mode, &new_path);
            }
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Get a human-readable type name for a YAML value
pub fn get_yaml_type_name(value: &YamlValue) -> &'static str {
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
