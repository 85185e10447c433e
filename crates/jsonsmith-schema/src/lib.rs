//! # jsonsmith-schema — Schemas, Validators, Fetchers
//!
//! ## Schema Model (`schema`)
//!
//! [`Schema`] wraps a JSON Schema document and exposes the discriminator
//! and constraint keywords the generators dispatch on, plus
//! [`Schema::default_validator`], which compiles the document into a
//! [`JsonSchemaValidator`].
//!
//! ## Validation (`validate`)
//!
//! The [`Validator`] trait has two entry points: a short-circuiting
//! predicate ([`Validator::is_valid`]) and a diagnostic check
//! ([`Validator::validate`]) that appends findings to a shared text sink.
//!
//! ## Fetching (`fetch`)
//!
//! [`SchemaFetcher`] resolves a schema from a URI. [`SchemaFetchers`] is the
//! named, ordered chain a wrapper consults; the first fetcher to produce a
//! schema wins.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsonsmith-core` internally.
//! - Schema compilation never reaches the network: unresolved `$ref`
//!   targets fall back to the permissive empty schema.
//! - Fetch failures are values, not panics; the chain logs them and moves on.

pub mod fetch;
pub mod schema;
pub mod validate;

pub use fetch::{
    load_document, FetchError, FileSchemaFetcher, RegistrySchemaFetcher, SchemaFetcher,
    SchemaFetchers, DEFAULT_FETCHER,
};
pub use schema::{Schema, SchemaError, SchemaType};
pub use validate::{
    FnValidator, JsonSchemaValidator, ValidationViolations, Validator, ValidatorBuildError,
    Violation,
};
