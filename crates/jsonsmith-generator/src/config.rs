//! # Generator Configuration
//!
//! [`GeneratorConfig`] layers constraint overrides on top of the generators'
//! built-in defaults: one global [`Constraints`] block, plus one block per
//! property name.
//!
//! ## Precedence
//!
//! per-property > global > built-in default, attribute by attribute. A
//! per-property `number_min` overrides only the minimum; the maximum still
//! falls through to the global block or the default.
//!
//! ## File Format
//!
//! JSON or YAML (chosen by extension), unknown keys rejected:
//!
//! ```yaml
//! global:
//!   number_min: 0
//!   number_max: 1000
//! properties:
//!   age:
//!     integer_min: 18
//!     integer_max: 99
//!   status:
//!     values: [active, suspended]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read generator config '{path}': {source}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The JSON content does not describe a configuration.
    #[error("invalid generator config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The YAML content does not describe a configuration.
    #[error("invalid generator config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Overrides for every constrained attribute family. `None` means "not set
/// at this tier".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Constraints {
    /// Inclusive lower bound for `number` values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_min: Option<i64>,
    /// Exclusive upper bound for the integral part of `number` values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_max: Option<i64>,
    /// Inclusive lower bound for `integer` values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_min: Option<i64>,
    /// Inclusive upper bound for `integer` values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer_max: Option<i64>,
    /// Minimum string length, in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_length_min: Option<u64>,
    /// Maximum string length, in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_length_max: Option<u64>,
    /// Minimum number of array items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_items_min: Option<u64>,
    /// Maximum number of array items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_items_max: Option<u64>,
    /// Fixed candidates; when non-empty, one is picked instead of running
    /// the schema's generator. Only honored in per-property blocks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Value>,
}

/// Layered generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Overrides applied to every node.
    pub global: Constraints,
    /// Overrides applied to nodes bound to a given property name.
    pub properties: BTreeMap<String, Constraints>,
}

impl GeneratorConfig {
    /// An empty configuration: every attribute falls through to defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable access to the global block.
    pub fn global_mut(&mut self) -> &mut Constraints {
        &mut self.global
    }

    /// Per-property block for `name`, if one exists.
    pub fn property(&self, name: &str) -> Option<&Constraints> {
        self.properties.get(name)
    }

    /// Per-property block for `name`, created empty if missing.
    pub fn property_mut(&mut self, name: impl Into<String>) -> &mut Constraints {
        self.properties.entry(name.into()).or_default()
    }

    /// Resolve one attribute through the per-property and global tiers.
    ///
    /// Returns `None` when neither tier sets it; the caller then applies its
    /// built-in default. `config` may be absent, in which case the result
    /// is always `None`.
    pub fn resolve<T>(
        config: Option<&Self>,
        property: Option<&str>,
        pick: impl Fn(&Constraints) -> Option<T>,
    ) -> Option<T> {
        let config = config?;
        property
            .and_then(|name| config.property(name))
            .and_then(&pick)
            .or_else(|| pick(&config.global))
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load a configuration file. `.yaml` and `.yml` files are parsed as
    /// YAML; anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }
}
