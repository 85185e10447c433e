//! # Validate Subcommand
//!
//! Wraps a document, resolves its schema through the default file
//! fetcher, and reports every violation. Exit code 0 means valid, 1 means
//! the document has violations.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use jsonsmith_schema::load_document;
use jsonsmith_wrapper::JsonElementWrapper;

use crate::file_uri;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON, or YAML by extension).
    #[arg(long)]
    pub schema: PathBuf,

    /// Document to validate (JSON, or YAML by extension).
    pub document: PathBuf,
}

/// Validate `args.document` against `args.schema`, writing the outcome to `out`.
pub fn run_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<u8> {
    let document = load_document(&args.document)
        .with_context(|| format!("loading document {}", args.document.display()))?;
    let uri = file_uri(&args.schema)?;

    let wrapper = JsonElementWrapper::with_schema_uri(document, uri.clone());
    if !wrapper.is_schema_resolved() {
        bail!("schema {uri} could not be resolved");
    }

    match wrapper.validate_report() {
        Ok(()) => {
            tracing::info!(document = %args.document.display(), "document is valid");
            writeln!(out, "OK")?;
            Ok(0)
        }
        Err(report) => {
            tracing::warn!(document = %args.document.display(), "document has violations");
            write!(out, "{report}")?;
            if !report.ends_with('\n') {
                writeln!(out)?;
            }
            Ok(1)
        }
    }
}
