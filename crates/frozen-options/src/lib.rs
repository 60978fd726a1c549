#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Immutable, layered configuration options.
//!
//! This crate provides a single [`FrozenMap`] type: a read-only tree of named
//! settings that can be layered from several sources and derived into
//! modified copies without touching the original.
//!
//! # Usage
//!
//! ```rust
//! use frozen_options::{Value, frozen_map};
//!
//! let defaults = frozen_map! {
//!     "setting1" => 1,
//!     "subsection1" => frozen_map! { "setting2" => 2, "setting3" => 3 },
//!     "subsection2" => frozen_map! { "setting4" => 4 },
//! };
//!
//! // Override existing keys only; nested maps merge in place.
//! let settings = defaults.with_values([
//!     ("setting1", Value::from(11)),
//!     ("subsection1", Value::from(frozen_map! { "setting3" => 33 })),
//! ]);
//!
//! assert_eq!(settings["setting1"], 11);
//! assert_eq!(*settings.lookup("subsection1.setting2").unwrap(), 2);
//! assert_eq!(*defaults.lookup("subsection1.setting3").unwrap(), 3);
//! ```
//!
//! # Layering
//!
//! Maps are built from an ordered list of sources followed by overrides:
//!
//! 1. **Sources** merge in order. When a key holds a nested map in both the
//!    working table and the incoming source, the two maps merge recursively.
//!    Any other value replaces the previous one.
//! 2. **Overrides** replace outright, even when both sides are maps.
//!
//! # Derivation
//!
//! - [`FrozenMap::with_values`] overrides keys that already exist and ignores
//!   the rest. It never adds keys.
//! - [`FrozenMap::without`] drops top-level keys.
//!
//! Nested maps are shared behind [`std::sync::Arc`]; a derived map reuses
//! every subtree it did not change.

/// Map construction.
pub mod builder;
/// Error types.
pub mod error;
/// The immutable option map.
pub mod map;
/// Entry-level merge rules.
mod merge;
/// Option values.
pub mod value;

// Re-export primary types at the crate root.
pub use builder::FrozenMapBuilder;
pub use error::{FrozenError, FrozenResult, WriteKind};
pub use map::FrozenMap;
pub use value::{Opaque, Scalar, Value};

/// Build a [`FrozenMap`] from `key => value` pairs.
///
/// Pairs are merged in order, exactly like a single constructor source.
///
/// ```rust
/// use frozen_options::frozen_map;
///
/// let opt = frozen_map! { "key" => 2, "test" => 42 };
/// assert_eq!(opt["test"], 42);
/// assert!(frozen_map! {}.is_empty());
/// ```
#[macro_export]
macro_rules! frozen_map {
    () => {
        $crate::FrozenMap::default()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        [$(($key, $crate::Value::from($value))),+]
            .into_iter()
            .collect::<$crate::FrozenMap>()
    };
}
