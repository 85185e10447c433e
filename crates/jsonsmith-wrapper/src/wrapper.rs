//! # JSON Element Wrapper
//!
//! [`JsonElementWrapper`] pairs one JSON element with the schema that
//! governs it, the fetchers able to resolve that schema, and the validators
//! the element is checked against.
//!
//! ## Schema Resolution
//!
//! The schema starts unresolved. Supplying a schema URI (at construction or
//! through [`set_json_schema_uri`](JsonElementWrapper::set_json_schema_uri))
//! or calling [`fetch_json_schema`](JsonElementWrapper::fetch_json_schema)
//! runs the fetcher chain while the schema is still unresolved. The first
//! fetcher to produce a schema wins; the schema is cached and its default
//! validator registered. A failed attempt leaves the wrapper unresolved and
//! is never retried implicitly. Only
//! [`set_json_schema`](JsonElementWrapper::set_json_schema) replaces a
//! resolved schema.
//!
//! ## Persistence
//!
//! The persisted form ([`PersistedWrapper`]) holds the element as its
//! canonical text, the content type, and the schema URI. The schema, the
//! validators and the fetchers are runtime state: a restored wrapper has
//! none of them.
//!
//! ## Mutation
//!
//! Every mutator takes `&mut self`. There is no interior locking; share a
//! wrapper across threads only behind the caller's own synchronization.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use jsonsmith_core::to_text;
use jsonsmith_schema::{Schema, SchemaFetcher, SchemaFetchers, Validator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use url::Url;

use crate::error::WrapperError;
use crate::validators::ValidatorSet;

/// Persisted form of a [`JsonElementWrapper`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedWrapper {
    /// The element, stored as its canonical text.
    #[serde(with = "element_text")]
    pub json: Value,
    /// Content type label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// URI of the governing schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema_uri: Option<Url>,
}

/// Serde adapter storing an element as a string holding its text form.
mod element_text {
    use jsonsmith_core::{parse_text, to_text};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_text(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_text(&text).map_err(D::Error::custom)
    }
}

/// A JSON element together with its schema, fetchers and validators.
pub struct JsonElementWrapper {
    json: Value,
    content_type: Option<String>,
    json_schema_uri: Option<Url>,
    json_schema: Option<Schema>,
    fetchers: SchemaFetchers,
    validators: ValidatorSet,
}

impl JsonElementWrapper {
    /// Wrap `json` with the default file fetcher installed.
    pub fn new(json: Value) -> Self {
        Self::with_fetchers(json, SchemaFetchers::with_default())
    }

    /// Wrap `json` with a content type label.
    pub fn with_content_type(json: Value, content_type: impl Into<String>) -> Self {
        let mut wrapper = Self::new(json);
        wrapper.content_type = Some(content_type.into());
        wrapper
    }

    /// Wrap `json` and resolve its schema from `uri` through the default
    /// fetcher.
    pub fn with_schema_uri(json: Value, uri: Url) -> Self {
        let mut wrapper = Self::new(json);
        wrapper.set_json_schema_uri(Some(uri));
        wrapper
    }

    /// Wrap `json` with a custom fetcher chain.
    pub fn with_fetchers(json: Value, fetchers: SchemaFetchers) -> Self {
        Self {
            json,
            content_type: None,
            json_schema_uri: None,
            json_schema: None,
            fetchers,
            validators: ValidatorSet::new(),
        }
    }

    /// Rebuild a wrapper from its persisted form. The result has no schema,
    /// no validators and no fetchers.
    pub fn from_persisted(persisted: PersistedWrapper) -> Self {
        Self {
            json: persisted.json,
            content_type: persisted.content_type,
            json_schema_uri: persisted.json_schema_uri,
            json_schema: None,
            fetchers: SchemaFetchers::new(),
            validators: ValidatorSet::new(),
        }
    }

    /// The persisted form of this wrapper.
    pub fn to_persisted(&self) -> PersistedWrapper {
        PersistedWrapper {
            json: self.json.clone(),
            content_type: self.content_type.clone(),
            json_schema_uri: self.json_schema_uri.clone(),
        }
    }

    // ---- element ----

    /// Replace the wrapped element, returning the previous one. Schema,
    /// validators and fetchers are kept.
    pub fn wrap(&mut self, json: Value) -> Value {
        std::mem::replace(&mut self.json, json)
    }

    /// The wrapped element.
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// Mutable access to the wrapped element.
    pub fn json_mut(&mut self) -> &mut Value {
        &mut self.json
    }

    /// Unwrap the element.
    pub fn into_json(self) -> Value {
        self.json
    }

    /// Content type label.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Set or clear the content type label.
    pub fn set_content_type(&mut self, content_type: Option<String>) {
        self.content_type = content_type;
    }

    // ---- schema ----

    /// URI of the governing schema.
    pub fn json_schema_uri(&self) -> Option<&Url> {
        self.json_schema_uri.as_ref()
    }

    /// Set or clear the schema URI. While the schema is unresolved, a new
    /// URI triggers a fetch attempt.
    pub fn set_json_schema_uri(&mut self, uri: Option<Url>) {
        self.json_schema_uri = uri;
        if self.json_schema.is_none() {
            self.try_fetch_schema();
        }
    }

    /// The resolved schema, if any. Never fetches.
    pub fn json_schema(&self) -> Option<&Schema> {
        self.json_schema.as_ref()
    }

    /// Install `schema` explicitly, replacing any resolved schema, and
    /// register its default validator.
    pub fn set_json_schema(&mut self, schema: Schema) {
        self.install_schema(schema);
    }

    /// Whether a schema has been resolved or installed.
    pub fn is_schema_resolved(&self) -> bool {
        self.json_schema.is_some()
    }

    /// The schema, fetching it first if still unresolved. Returns `None`
    /// when there is no URI or no fetcher produces a schema.
    pub fn fetch_json_schema(&mut self) -> Option<&Schema> {
        if self.json_schema.is_none() {
            self.try_fetch_schema();
        }
        self.json_schema.as_ref()
    }

    fn try_fetch_schema(&mut self) {
        let Some(uri) = self.json_schema_uri.as_ref() else {
            return;
        };
        match self.fetchers.fetch_first(uri) {
            Some(schema) => self.install_schema(schema),
            None => tracing::debug!(%uri, "schema remains unresolved"),
        }
    }

    fn install_schema(&mut self, schema: Schema) {
        if let Some(validator) = schema.default_validator() {
            self.validators.insert(validator);
        }
        self.json_schema = Some(schema);
    }

    // ---- fetchers ----

    /// Register `fetcher` under `name`, after the existing fetchers, or in
    /// place of a fetcher with the same name. Returns the replaced fetcher.
    pub fn add_schema_fetcher<F>(
        &mut self,
        name: impl Into<String>,
        fetcher: F,
    ) -> Option<Box<dyn SchemaFetcher>>
    where
        F: SchemaFetcher + 'static,
    {
        self.fetchers.insert(name, fetcher)
    }

    /// The fetcher registered under the default name.
    pub fn default_schema_fetcher(&self) -> Option<&dyn SchemaFetcher> {
        self.fetchers.default_fetcher()
    }

    /// Replace the fetcher registered under the default name.
    pub fn set_default_schema_fetcher<F>(&mut self, fetcher: F) -> Option<Box<dyn SchemaFetcher>>
    where
        F: SchemaFetcher + 'static,
    {
        self.fetchers.set_default(fetcher)
    }

    /// Replace the whole fetcher chain.
    pub fn set_schema_fetchers(&mut self, fetchers: SchemaFetchers) {
        self.fetchers.replace_all(fetchers);
    }

    /// The fetcher chain.
    pub fn schema_fetchers(&self) -> &SchemaFetchers {
        &self.fetchers
    }

    /// Mutable access to the fetcher chain.
    pub fn schema_fetchers_mut(&mut self) -> &mut SchemaFetchers {
        &mut self.fetchers
    }

    // ---- validation ----

    /// Register a validator unless an equivalent one is present. Returns
    /// whether it was added.
    pub fn add_validator(&mut self, validator: Arc<dyn Validator>) -> bool {
        self.validators.insert(validator)
    }

    /// Registered validators.
    pub fn validators(&self) -> &ValidatorSet {
        &self.validators
    }

    /// True when every validator accepts the element. Stops at the first
    /// rejection.
    pub fn is_data_valid(&self) -> bool {
        self.validators.is_valid(&self.json)
    }

    /// Run every validator, appending findings to `report`. Returns true
    /// when all of them passed.
    pub fn validate_data(&self, report: &mut String) -> bool {
        self.validators.validate(&self.json, report)
    }

    /// Like [`validate_data`](Self::validate_data), returning the findings
    /// as the error.
    pub fn validate_report(&self) -> Result<(), String> {
        let mut report = String::new();
        if self.validate_data(&mut report) {
            Ok(())
        } else {
            Err(report)
        }
    }

    // ---- persistence ----

    /// Serialize to the persisted text form.
    ///
    /// # Errors
    ///
    /// [`WrapperError::Serialize`] if the persisted form cannot be rendered.
    pub fn to_persisted_string(&self) -> Result<String, WrapperError> {
        serde_json::to_string(&self.to_persisted()).map_err(WrapperError::Serialize)
    }

    /// Restore from persisted text.
    ///
    /// # Errors
    ///
    /// [`WrapperError::Parse`] if the text, or the element text inside it,
    /// is malformed.
    pub fn restore_from_str(text: &str) -> Result<Self, WrapperError> {
        let persisted: PersistedWrapper =
            serde_json::from_str(text).map_err(WrapperError::Parse)?;
        Ok(Self::from_persisted(persisted))
    }

    /// Restore from a reader holding persisted text.
    ///
    /// # Errors
    ///
    /// [`WrapperError::Io`] if reading fails, [`WrapperError::Parse`] if the
    /// bytes are not well-formed persisted text (invalid UTF-8 included).
    pub fn restore_from_reader(mut reader: impl Read) -> Result<Self, WrapperError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let persisted: PersistedWrapper =
            serde_json::from_slice(&bytes).map_err(WrapperError::Parse)?;
        Ok(Self::from_persisted(persisted))
    }
}

impl fmt::Display for JsonElementWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_text(&self.json))
    }
}

impl fmt::Debug for JsonElementWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonElementWrapper")
            .field("json", &self.json)
            .field("content_type", &self.content_type)
            .field("json_schema_uri", &self.json_schema_uri.as_ref().map(Url::as_str))
            .field("schema_resolved", &self.json_schema.is_some())
            .field("validators", &self.validators.len())
            .field("fetchers", &self.fetchers)
            .finish()
    }
}

impl Serialize for JsonElementWrapper {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_persisted().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JsonElementWrapper {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        PersistedWrapper::deserialize(deserializer).map(Self::from_persisted)
    }
}
