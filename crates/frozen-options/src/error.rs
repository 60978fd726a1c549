//! Error types for frozen option trees.

use std::fmt;

use thiserror::Error;

/// The kind of write a frozen map rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// Setting or replacing a key.
    Assignment,
    /// Removing a key.
    Deletion,
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assignment => write!(f, "assignment"),
            Self::Deletion => write!(f, "deletion"),
        }
    }
}

/// Errors returned by [`FrozenMap`](crate::FrozenMap) accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrozenError {
    /// The requested key is not defined.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing key (or dotted path up to the missing segment).
        key: String,
    },

    /// A write was attempted on a frozen map.
    #[error("'FrozenMap' object does not support item {kind} (key '{key}')")]
    ImmutableWrite {
        /// Whether the write was an assignment or a deletion.
        kind: WriteKind,
        /// The key the caller tried to write.
        key: String,
    },

    /// A path walked through a value that is not a nested map.
    #[error("value at '{path}' is not a mapping")]
    NotAMapping {
        /// Dotted path of the scalar value.
        path: String,
    },
}

/// Result type for frozen map operations.
pub type FrozenResult<T> = Result<T, FrozenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_messages_distinguish_kind() {
        let assign = FrozenError::ImmutableWrite {
            kind: WriteKind::Assignment,
            key: "value".to_owned(),
        };
        let delete = FrozenError::ImmutableWrite {
            kind: WriteKind::Deletion,
            key: "value".to_owned(),
        };

        assert!(assign.to_string().contains("assignment"));
        assert!(!assign.to_string().contains("deletion"));
        assert!(delete.to_string().contains("deletion"));
    }

    #[test]
    fn test_key_not_found_names_key() {
        let err = FrozenError::KeyNotFound {
            key: "an_other".to_owned(),
        };
        assert_eq!(err.to_string(), "key not found: an_other");
    }
}
