//! # Generation Errors

use thiserror::Error;

/// Error raised while generating a value.
///
/// These are caller errors: the configuration (or schema) asked for
/// something that cannot be produced. Generators never clamp or guess.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// The effective range for an attribute is empty.
    #[error("invalid {attribute} range: min {min}, max {max}")]
    InvalidRange {
        /// Attribute family, e.g. `"number"` or `"string length"`.
        attribute: &'static str,
        /// Effective lower bound.
        min: i64,
        /// Effective upper bound.
        max: i64,
    },

    /// The drawn number has no JSON representation.
    #[error("generated number {value} is not representable in JSON")]
    NonFinite {
        /// The offending value.
        value: f64,
    },
}
