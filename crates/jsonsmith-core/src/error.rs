//! # Error Types
//!
//! Errors raised by the element layer. Higher crates define their own
//! `thiserror` enums and wrap these with `#[from]` where they cross the
//! element boundary.

use thiserror::Error;

use crate::element::ElementKind;

/// Error while converting between an element and its text form, or while
/// treating an element as a specific shape.
#[derive(Error, Debug)]
pub enum ElementError {
    /// The text is not a well-formed JSON document.
    #[error("malformed JSON text: {0}")]
    Parse(#[from] serde_json::Error),

    /// An object was required but a different kind of element was found.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// Kind of the element that was found instead.
        found: ElementKind,
    },
}
