//! The immutable option map.

use std::collections::{BTreeMap, BTreeSet, HashMap, btree_map};
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::builder::FrozenMapBuilder;
use crate::error::{FrozenError, FrozenResult, WriteKind};
use crate::merge::{Entries, overlay_entry};
use crate::value::Value;

/// An immutable, string-keyed tree of configuration options.
///
/// Nested maps are held behind [`Arc`], so deriving a new map with
/// [`with_values`](Self::with_values) or [`without`](Self::without) only
/// allocates the parts that change; every untouched subtree is shared with
/// the original.
///
/// Iteration yields keys in ascending order. Equality ignores how a map was
/// built and compares keys and values only.
#[derive(Clone, Default, PartialEq)]
pub struct FrozenMap {
    entries: Entries,
}

impl FrozenMap {
    /// Start building a map from sources and overrides.
    #[must_use]
    pub fn builder() -> FrozenMapBuilder {
        FrozenMapBuilder::new()
    }

    /// Build a map by merging `sources` in order, then applying `overrides`.
    ///
    /// Equivalent to calling [`FrozenMapBuilder::merge`] for every source and
    /// [`FrozenMapBuilder::set`] for every override.
    #[must_use]
    pub fn new<S, I, K, V, O, OK, OV>(sources: S, overrides: O) -> Self
    where
        S: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
        O: IntoIterator<Item = (OK, OV)>,
        OK: Into<String>,
        OV: Into<Value>,
    {
        let builder = sources
            .into_iter()
            .fold(Self::builder(), FrozenMapBuilder::merge);
        overrides
            .into_iter()
            .fold(builder, |builder, (key, value)| builder.set(key, value))
            .build()
    }

    pub(crate) fn from_entries(entries: Entries) -> Self {
        Self { entries }
    }

    pub(crate) fn entries(&self) -> &Entries {
        &self.entries
    }

    /// Look up the value bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError::KeyNotFound`] if `key` is not defined.
    pub fn get(&self, key: &str) -> FrozenResult<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| FrozenError::KeyNotFound {
                key: key.to_owned(),
            })
    }

    /// Look up a nested map bound to `key`.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError::KeyNotFound`] if `key` is not defined, or
    /// [`FrozenError::NotAMapping`] if it holds a scalar.
    pub fn get_map(&self, key: &str) -> FrozenResult<&Arc<FrozenMap>> {
        self.get(key)?
            .as_map()
            .ok_or_else(|| FrozenError::NotAMapping {
                path: key.to_owned(),
            })
    }

    /// Walk a dotted path such as `"section.setting"` through nested maps.
    ///
    /// A top-level key equal to the whole of `path` is returned as is, so
    /// every key readable with [`get`](Self::get) is readable here too, dots
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`FrozenError::KeyNotFound`] naming the path up to the first
    /// missing segment, or [`FrozenError::NotAMapping`] naming the path of a
    /// scalar that the walk tried to descend into.
    pub fn lookup(&self, path: &str) -> FrozenResult<&Value> {
        if let Some(value) = self.entries.get(path) {
            return Ok(value);
        }

        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut walked = first.to_owned();
        let mut current = self.get(first)?;

        for segment in segments {
            let Value::Nested(map) = current else {
                return Err(FrozenError::NotAMapping { path: walked });
            };
            walked.push('.');
            walked.push_str(segment);
            current = map
                .entries
                .get(segment)
                .ok_or_else(|| FrozenError::KeyNotFound {
                    key: walked.clone(),
                })?;
        }

        Ok(current)
    }

    /// Whether `key` is defined.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Values in key order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    /// `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reject an attempt to set `key`.
    ///
    /// Frozen maps cannot be written to; derive a new map with
    /// [`FrozenMap::new`] or [`with_values`](Self::with_values) instead.
    ///
    /// # Errors
    ///
    /// Always returns [`FrozenError::ImmutableWrite`] with
    /// [`WriteKind::Assignment`].
    #[allow(clippy::unused_self)]
    pub fn try_insert(&self, key: impl Into<String>, _value: impl Into<Value>) -> FrozenResult<()> {
        Err(FrozenError::ImmutableWrite {
            kind: WriteKind::Assignment,
            key: key.into(),
        })
    }

    /// Reject an attempt to remove `key`.
    ///
    /// Use [`without`](Self::without) to derive a map lacking the key.
    ///
    /// # Errors
    ///
    /// Always returns [`FrozenError::ImmutableWrite`] with
    /// [`WriteKind::Deletion`].
    #[allow(clippy::unused_self)]
    pub fn try_remove(&self, key: impl Into<String>) -> FrozenResult<()> {
        Err(FrozenError::ImmutableWrite {
            kind: WriteKind::Deletion,
            key: key.into(),
        })
    }

    /// Return a copy with existing keys overridden by `source`.
    ///
    /// Keys that this map does not define are ignored: `with_values` never
    /// adds keys. When both the current and the supplied value are maps the
    /// override recurses, leaving unspecified nested keys in place. Nested
    /// maps the override does not change are shared with `self`.
    #[must_use]
    pub fn with_values<I, K, V>(&self, source: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.with_values_all([source])
    }

    /// Like [`with_values`](Self::with_values), applying several sources in
    /// order.
    #[must_use]
    pub fn with_values_all<S, I, K, V>(&self, sources: S) -> Self
    where
        S: IntoIterator<Item = I>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entries = self.entries.clone();
        for source in sources {
            for (key, value) in source {
                overlay_entry(&mut entries, "", key.into(), value.into());
            }
        }
        Self::from_entries(entries)
    }

    /// Return a copy without the given top-level keys.
    ///
    /// Keys that are not defined are ignored.
    #[must_use]
    pub fn without<I>(&self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let omit: BTreeSet<String> = keys.into_iter().map(|k| k.as_ref().to_owned()).collect();
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| !omit.contains(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self::from_entries(entries)
    }
}

impl Index<&str> for FrozenMap {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.entries.get(key) {
            Some(value) => value,
            None => panic!("key not found: {key}"),
        }
    }
}

impl fmt::Debug for FrozenMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FrozenMap(")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value:?}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for FrozenMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key:?}: {value:?}")?;
        }
        f.write_str("}")
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FrozenMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::builder().merge(iter).build()
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for FrozenMap {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<Value>, S> From<HashMap<K, V, S>> for FrozenMap {
    fn from(map: HashMap<K, V, S>) -> Self {
        map.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a FrozenMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for FrozenMap {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
