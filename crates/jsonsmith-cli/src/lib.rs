//! # jsonsmith-cli — Command-Line Interface
//!
//! ## Subcommands
//!
//! - `generate`: emit randomized documents for a schema, optionally
//!   shaped by a generator configuration file
//! - `validate`: wrap a document, resolve its schema from a file, and
//!   report every violation
//!
//! ## Crate Policy
//!
//! - Argument parsing lives next to its handler; handlers return an exit
//!   code and write to the sink they are given.
//! - Handlers delegate to the library crates; no generation or validation
//!   logic lives here.

use std::path::Path;

use anyhow::{Context, Result};
use url::Url;

pub mod generate;
pub mod validate;

/// `file://` URI for an existing local path.
pub(crate) fn file_uri(path: &Path) -> Result<Url> {
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("cannot resolve path {}", path.display()))?;
    Url::from_file_path(&absolute)
        .map_err(|()| anyhow::anyhow!("cannot express {} as a file URI", absolute.display()))
}
