//! Construction of [`FrozenMap`] values.
//!
//! The builder owns a mutable working table while sources and overrides are
//! applied; [`FrozenMapBuilder::build`] consumes it and hands the table to an
//! immutable map. There is no way back from a map to a builder.

use crate::map::FrozenMap;
use crate::merge::{Entries, merge_entry};
use crate::value::Value;

/// Builder for [`FrozenMap`].
#[derive(Debug, Clone, Default)]
pub struct FrozenMapBuilder {
    entries: Entries,
    overrides: Entries,
}

impl FrozenMapBuilder {
    /// Start an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a source into the working table.
    ///
    /// Sources apply in call order. A key that already holds a nested map
    /// and receives another nested map is merged recursively; any other
    /// value replaces the current one.
    #[must_use]
    pub fn merge<I, K, V>(mut self, source: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in source {
            merge_entry(&mut self.entries, key.into(), value.into());
        }
        self
    }

    /// Set a key outright once all sources are merged.
    ///
    /// Overrides never merge, even when both sides are maps, and may
    /// introduce keys no source defines.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    /// Consume the builder and freeze the result.
    #[must_use]
    pub fn build(self) -> FrozenMap {
        let mut entries = self.entries;
        entries.extend(self.overrides);
        FrozenMap::from_entries(entries)
    }
}
