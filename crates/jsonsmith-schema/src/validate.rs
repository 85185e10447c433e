//! # Validation
//!
//! The [`Validator`] contract and the two implementations shipped here:
//! [`JsonSchemaValidator`], compiled from a [`Schema`] by the `jsonschema`
//! crate, and [`FnValidator`], which adapts a closure.
//!
//! ## Two Entry Points
//!
//! - [`Validator::is_valid`] answers pass/fail and may stop at the first
//!   problem.
//! - [`Validator::validate`] appends every finding to a shared text sink.
//!   Callers that compose several validators run all of them, so the sink
//!   ends up holding the complete failure detail.
//!
//! ## Schema Resolution
//!
//! Compilation installs an offline retriever. `$ref` targets are looked up
//! in the schema's resource map (by full URI, then by bare filename); any
//! target still unresolved compiles to the permissive empty schema rather
//! than triggering a network request.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use jsonschema::{Retrieve, Uri};
use jsonsmith_core::to_text;
use serde_json::Value;
use thiserror::Error;

use crate::fetch::resolve_in;
use crate::schema::Schema;

/// A rule checked against a JSON instance.
pub trait Validator: Send + Sync {
    /// Human-readable name, used in logs and diagnostic headers.
    fn title(&self) -> &str;

    /// Key used to suppress duplicate registrations. Two validators with
    /// the same identity are interchangeable. Defaults to the title.
    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.title())
    }

    /// Pass/fail check.
    fn is_valid(&self, instance: &Value) -> bool;

    /// Diagnostic check: appends one line per finding to `report` and
    /// returns whether the instance passed.
    fn validate(&self, instance: &Value, report: &mut String) -> bool;
}

impl fmt::Debug for dyn Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("title", &self.title())
            .finish_non_exhaustive()
    }
}

/// The schema document could not be compiled into a validator.
#[derive(Error, Debug)]
#[error("validator build error for schema '{schema}': {reason}")]
pub struct ValidatorBuildError {
    /// Label of the schema that failed to compile.
    pub schema: String,
    /// Reason reported by the compiler.
    pub reason: String,
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, Default)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Resolves `$ref` URIs against documents held in memory.
struct OfflineRetriever {
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = resolve_in(&self.schemas_by_uri, uri_str) {
            return Ok(value.clone());
        }
        tracing::debug!(uri = uri_str, "unresolved $ref, using permissive schema");
        Ok(serde_json::json!({}))
    }
}

/// A validator compiled from a JSON Schema document.
pub struct JsonSchemaValidator {
    title: String,
    identity: String,
    compiled: jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compile `schema` with its resources available for `$ref` resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ValidatorBuildError`] if the document is not a valid schema.
    pub fn new(schema: &Schema) -> Result<Self, ValidatorBuildError> {
        let mut opts = jsonschema::options();
        opts.with_retriever(OfflineRetriever {
            schemas_by_uri: schema.resources().clone(),
        });

        let compiled = opts
            .build(schema.document())
            .map_err(|e| ValidatorBuildError {
                schema: schema.label(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            title: format!("JSON Schema {}", schema.label()),
            identity: format!("json-schema:{}", to_text(schema.document())),
            compiled,
        })
    }

    /// Every violation of the schema by `instance`.
    pub fn violations(&self, instance: &Value) -> ValidationViolations {
        let violations = self
            .compiled
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        ValidationViolations { violations }
    }
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

impl Validator for JsonSchemaValidator {
    fn title(&self) -> &str {
        &self.title
    }

    fn identity(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.identity)
    }

    fn is_valid(&self, instance: &Value) -> bool {
        self.compiled.is_valid(instance)
    }

    fn validate(&self, instance: &Value, report: &mut String) -> bool {
        let violations = self.violations(instance);
        if violations.is_empty() {
            return true;
        }
        report.push_str(&format!(
            "{}: {} violation(s)\n{violations}\n",
            self.title,
            violations.len()
        ));
        false
    }
}

/// Adapts a closure returning `Err(message)` on failure.
pub struct FnValidator<F> {
    title: String,
    check: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&Value) -> Result<(), String> + Send + Sync,
{
    /// Create a validator named `title` around `check`.
    pub fn new(title: impl Into<String>, check: F) -> Self {
        Self {
            title: title.into(),
            check,
        }
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&Value) -> Result<(), String> + Send + Sync,
{
    fn title(&self) -> &str {
        &self.title
    }

    fn is_valid(&self, instance: &Value) -> bool {
        (self.check)(instance).is_ok()
    }

    fn validate(&self, instance: &Value, report: &mut String) -> bool {
        match (self.check)(instance) {
            Ok(()) => true,
            Err(message) => {
                report.push_str(&format!("{}:\n  (root): {message}\n", self.title));
                false
            }
        }
    }
}
