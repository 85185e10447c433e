//! # jsonsmith-core — Foundational Types
//!
//! Leaf crate of the jsonsmith workspace. Every other crate depends on it;
//! it depends on nothing internal.
//!
//! The JSON element tree itself is `serde_json::Value`, built with the
//! `preserve_order` feature so that objects keep insertion order. This crate
//! adds the pieces the rest of the workspace shares on top of it:
//!
//! 1. **Text codec.** [`to_text`] and [`parse_text`] are the single path
//!    between an element and its canonical text form. Persistence and
//!    display go through them, never through ad hoc `format!` calls.
//!
//! 2. **Element kinds.** [`ElementKind`] names the shape of a value for
//!    error messages and shape checks.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsonsmith-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod element;
pub mod error;

pub use element::{as_object, as_object_mut, key_at, parse_text, to_text, ElementKind, JsonObject};
pub use error::ElementError;
