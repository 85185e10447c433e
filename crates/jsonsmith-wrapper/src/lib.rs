//! # jsonsmith-wrapper — Schema-Aware JSON Elements
//!
//! ## Wrapper (`wrapper`)
//!
//! [`JsonElementWrapper`] owns one JSON element plus the machinery around
//! it: an optional content type, an optional schema URI, the lazily
//! resolved [`Schema`](jsonsmith_schema::Schema), a named fetcher chain,
//! and a [`ValidatorSet`]. It persists as [`PersistedWrapper`], which keeps
//! the element as text and drops everything that is runtime state.
//!
//! ## Validators (`validators`)
//!
//! [`ValidatorSet`] is the ordered, duplicate-free collection a wrapper
//! validates against, with a short-circuiting predicate and a diagnostic
//! pass that runs every validator.
//!
//! ## Typed Objects (`typed`)
//!
//! [`TypedJsonObject<T>`] projects a wrapped object's values onto a domain
//! type through an [`ElementConverter`]; [`SerdeConverter`] covers any
//! `T: Serialize + DeserializeOwned`.
//!
//! ## Crate Policy
//!
//! - Single-writer: mutation goes through `&mut self`, with no hidden
//!   locking.
//! - Fetch failures never surface as errors here; an unresolved schema is
//!   simply absent.

pub mod error;
pub mod typed;
pub mod validators;
pub mod wrapper;

pub use error::{TypedObjectError, WrapperError};
pub use typed::{ElementConverter, Iter, SerdeConverter, TypedJsonObject};
pub use validators::ValidatorSet;
pub use wrapper::{JsonElementWrapper, PersistedWrapper};
