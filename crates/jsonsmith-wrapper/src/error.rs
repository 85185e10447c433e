//! # Error Types

use jsonsmith_core::ElementError;
use thiserror::Error;

/// Error persisting a wrapper or restoring it from its persisted text.
///
/// Obtaining the text and interpreting it fail differently: an I/O failure
/// says nothing about the text, a parse failure says the text is bad.
#[derive(Error, Debug)]
pub enum WrapperError {
    /// Reading the persisted text failed.
    #[error("cannot read persisted wrapper: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted text, or the element text inside it, is malformed.
    #[error("malformed persisted wrapper: {0}")]
    Parse(#[source] serde_json::Error),

    /// The wrapper could not be rendered to its persisted text.
    #[error("cannot serialize wrapper: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Error reading or writing a [`TypedJsonObject`](crate::TypedJsonObject).
#[derive(Error, Debug)]
pub enum TypedObjectError {
    /// No entry under the requested key.
    #[error("no value for key '{key}'")]
    NotFound {
        /// The requested key.
        key: String,
    },

    /// The entry exists but does not convert to or from the target type.
    #[error("value for key '{key}' is malformed: {reason}")]
    Malformed {
        /// Key of the offending entry.
        key: String,
        /// Converter message.
        reason: String,
    },

    /// Positional access past the last entry.
    #[error("position {pos} is out of bounds for an object of {len} entries")]
    IndexOutOfBounds {
        /// Requested position.
        pos: usize,
        /// Number of entries.
        len: usize,
    },

    /// The wrapped element is not an object.
    #[error(transparent)]
    NotAnObject(#[from] ElementError),
}
