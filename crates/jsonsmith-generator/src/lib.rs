//! # jsonsmith-generator — Randomized Test Data
//!
//! Produces JSON instances for a [`Schema`](jsonsmith_schema::Schema), one
//! value per schema node.
//!
//! ## Dispatch
//!
//! [`GeneratorKind::for_schema`] maps a schema node to exactly one variant
//! (boolean, number, integer, string, enum, array, object, null, and the
//! `time`, `date`, `date-time`, `uuid` string formats).
//! [`AnyGenerator`] is the closed dispatch table; each variant also
//! implements the [`Generator`] trait on its own.
//!
//! ## Constraint Resolution
//!
//! Every constrained attribute resolves through three tiers, evaluated at
//! `generate()` time and never cached:
//!
//! 1. the per-property entry in [`GeneratorConfig::properties`], if a
//!    property name is bound and an entry exists;
//! 2. the global entry [`GeneratorConfig::global`];
//! 3. the built-in default of the variant.
//!
//! ## Randomness
//!
//! Generators borrow their randomness source for the duration of one
//! `generate()` call. They perform no I/O beyond reading the clock in the
//! temporal variants.

pub mod config;
pub mod error;
pub mod generators;

pub use config::{ConfigError, Constraints, GeneratorConfig};
pub use error::GenerateError;
pub use generators::{
    generate_node, AnyGenerator, Generator, GeneratorContext, GeneratorKind, JsonGenerator,
};
