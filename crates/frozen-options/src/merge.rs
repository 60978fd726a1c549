//! Entry-level merge rules shared by construction and derivation.
//!
//! Both rules operate on a working table that is owned by the caller and only
//! frozen into a [`FrozenMap`] once every input has been applied.
//!
//! - [`merge_entry`] is the constructor rule: nested maps merge recursively,
//!   everything else replaces, and unknown keys are added.
//! - [`overlay_entry`] is the `with_values` rule: only keys that already exist
//!   are touched, and nested maps that end up unchanged keep their identity.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::map::FrozenMap;
use crate::value::Value;

/// Working table a map is built from.
pub(crate) type Entries = BTreeMap<String, Value>;

/// Merge two nested maps, `incoming` taking precedence.
fn merge_maps(existing: &FrozenMap, incoming: &FrozenMap) -> FrozenMap {
    FrozenMap::builder().merge(existing).merge(incoming).build()
}

/// Apply one source entry to `entries` using the constructor rule.
pub(crate) fn merge_entry(entries: &mut Entries, key: String, value: Value) {
    let merged = match (entries.get(&key), &value) {
        (Some(Value::Nested(existing)), Value::Nested(incoming)) => {
            trace!(key = %key, "merging nested map");
            Some(merge_maps(existing, incoming))
        },
        _ => None,
    };

    entries.insert(key, merged.map_or(value, Value::from));
}

/// Dotted path of `key` below `prefix` (`""` for the top level).
fn field_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Recursively overlay `source` onto the keys `base` already defines.
/// `prefix` is the dotted path of `base` within the top-level map.
///
/// Returns `None` if no entry of `base` was touched, so the caller can keep
/// sharing the original map.
pub(crate) fn overlay_map(base: &FrozenMap, source: &FrozenMap, prefix: &str) -> Option<FrozenMap> {
    let mut entries = base.entries().clone();
    let mut touched = false;
    for (key, value) in source {
        touched |= overlay_entry(&mut entries, prefix, key.clone(), value.clone());
    }
    touched.then(|| FrozenMap::from_entries(entries))
}

/// Apply one override to `entries` using the `with_values` rule.
///
/// Returns whether `entries` changed.
pub(crate) fn overlay_entry(entries: &mut Entries, prefix: &str, key: String, value: Value) -> bool {
    let Some(current) = entries.get_mut(&key) else {
        debug!(path = %field_path(prefix, &key), "ignoring override for undefined key");
        return false;
    };

    let nested_update = match (&*current, &value) {
        (Value::Nested(nested), Value::Nested(incoming)) => {
            Some(overlay_map(nested, incoming, &field_path(prefix, &key)))
        },
        _ => None,
    };

    match nested_update {
        Some(Some(updated)) => {
            *current = Value::from(updated);
            true
        },
        Some(None) => false,
        None => {
            *current = value;
            true
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn nested(pairs: &[(&str, i64)]) -> Value {
        Value::from(pairs.iter().map(|(k, v)| (*k, *v)).collect::<FrozenMap>())
    }

    #[test]
    fn test_merge_entry_scalars_replace() {
        let mut entries = Entries::new();
        merge_entry(&mut entries, "max_tokens".to_owned(), Value::from(4096));
        merge_entry(&mut entries, "max_tokens".to_owned(), Value::from(8192));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries["max_tokens"], 8192);
    }

    #[test]
    fn test_merge_entry_nested_union() {
        let mut entries = Entries::new();
        merge_entry(
            &mut entries,
            "model".to_owned(),
            nested(&[("provider", 1), ("max_tokens", 4096)]),
        );
        merge_entry(
            &mut entries,
            "model".to_owned(),
            nested(&[("max_tokens", 8192), ("api_key", 7)]),
        );

        let model = entries["model"].as_map().unwrap();
        assert_eq!(model.len(), 3);
        assert_eq!(model["provider"], 1);
        assert_eq!(model["max_tokens"], 8192);
        assert_eq!(model["api_key"], 7);
    }

    #[test]
    fn test_merge_entry_scalar_over_map_replaces() {
        let mut entries = Entries::new();
        merge_entry(&mut entries, "model".to_owned(), nested(&[("provider", 1)]));
        merge_entry(&mut entries, "model".to_owned(), Value::from("claude"));

        assert_eq!(entries["model"], "claude");
    }

    #[test]
    fn test_overlay_entry_ignores_unknown_keys() {
        let mut entries = Entries::new();
        entries.insert("test".to_owned(), Value::from(42));

        assert!(!overlay_entry(&mut entries, "", "an_other".to_owned(), Value::from("hello")));
        assert!(!entries.contains_key("an_other"));
        assert!(overlay_entry(&mut entries, "", "test".to_owned(), Value::from(4)));
        assert_eq!(entries["test"], 4);
    }

    #[test]
    fn test_field_path_nests_under_prefix() {
        assert_eq!(field_path("", "setting1"), "setting1");
        assert_eq!(field_path("subsection1", "not_a_setting"), "subsection1.not_a_setting");
        assert_eq!(field_path("a.b", "c"), "a.b.c");
    }

    #[test]
    fn test_overlay_map_untouched_returns_none() {
        let base: FrozenMap = [("a", 1), ("b", 2)].into_iter().collect();
        let source: FrozenMap = [("c", 3)].into_iter().collect();

        assert!(overlay_map(&base, &source, "").is_none());
    }

    #[test]
    fn test_overlay_entry_keeps_unchanged_nested_identity() {
        let inner = Arc::new([("x", 1)].into_iter().collect::<FrozenMap>());
        let mut entries = Entries::new();
        entries.insert("section".to_owned(), Value::from(Arc::clone(&inner)));

        let changed = overlay_entry(&mut entries, "", "section".to_owned(), nested(&[("y", 2)]));

        assert!(!changed);
        assert!(Arc::ptr_eq(entries["section"].as_map().unwrap(), &inner));
    }
}
