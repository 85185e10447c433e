//! # Schema Fetching
//!
//! A [`SchemaFetcher`] turns a URI into a [`Schema`], or reports that it has
//! nothing for that URI. [`SchemaFetchers`] holds several of them under
//! names, in registration order, and consults them as a fallback chain.
//!
//! ## Fallback Protocol
//!
//! [`SchemaFetchers::fetch_first`] tries each fetcher in order:
//!
//! 1. `Ok(Some(schema))` wins and short-circuits the rest of the chain.
//! 2. `Ok(None)` means "not mine"; the next fetcher is tried.
//! 3. `Err(_)` is logged and treated like `Ok(None)`.
//!
//! An empty chain, or one where every fetcher declines or fails, yields
//! `None`. There is no retry and no timeout: a fetcher that blocks blocks
//! its caller, and bounding latency is the fetcher's own business.
//!
//! ## Shipped Fetchers
//!
//! - [`FileSchemaFetcher`] serves `file://` URIs from disk (JSON, or YAML by
//!   extension). It is the conventional [`DEFAULT_FETCHER`].
//! - [`RegistrySchemaFetcher`] serves documents held in memory, optionally
//!   loaded from a directory of `*.schema.json` files.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::schema::{Schema, SchemaError};

/// Name under which the default fetcher is registered.
pub const DEFAULT_FETCHER: &str = "default";

/// Error raised by a fetcher.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URI does not map to a local path.
    #[error("URI '{uri}' does not name a local file")]
    InvalidPath {
        /// The offending URI.
        uri: String,
    },

    /// The schema source could not be read.
    #[error("cannot read schema at '{location}': {source}")]
    Io {
        /// Path or URI that was being read.
        location: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The schema source was read but is not valid JSON or YAML.
    #[error("cannot parse schema at '{location}': {reason}")]
    Parse {
        /// Path or URI that was being parsed.
        location: String,
        /// Reason the parser gave.
        reason: String,
    },

    /// The document parsed but is not a schema.
    #[error("invalid schema at '{location}': {source}")]
    Schema {
        /// Path or URI of the document.
        location: String,
        /// Why the document was rejected.
        #[source]
        source: SchemaError,
    },
}

/// A strategy that resolves a [`Schema`] from a URI.
pub trait SchemaFetcher: Send + Sync {
    /// Resolve `uri`. `Ok(None)` means this fetcher has nothing for it.
    fn fetch(&self, uri: &Url) -> Result<Option<Schema>, FetchError>;
}

impl<F> SchemaFetcher for F
where
    F: Fn(&Url) -> Result<Option<Schema>, FetchError> + Send + Sync,
{
    fn fetch(&self, uri: &Url) -> Result<Option<Schema>, FetchError> {
        self(uri)
    }
}

/// Serves `file://` URIs from the local filesystem. Other schemes are
/// declined.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSchemaFetcher;

impl SchemaFetcher for FileSchemaFetcher {
    fn fetch(&self, uri: &Url) -> Result<Option<Schema>, FetchError> {
        if uri.scheme() != "file" {
            return Ok(None);
        }
        let path = uri.to_file_path().map_err(|()| FetchError::InvalidPath {
            uri: uri.to_string(),
        })?;
        let document = load_document(&path)?;
        let schema = Schema::new(document).map_err(|source| FetchError::Schema {
            location: uri.to_string(),
            source,
        })?;
        Ok(Some(schema.with_uri(uri.clone())))
    }
}

/// Serves schema documents held in memory, keyed by URI.
///
/// Lookups try the full URI (without fragment) first, then the bare
/// filename, then any registered URI ending in `/<filename>`. The last step
/// lets a document registered under one base URI answer for the same
/// filename under another.
#[derive(Debug, Clone, Default)]
pub struct RegistrySchemaFetcher {
    schemas_by_uri: Arc<HashMap<String, Value>>,
}

impl RegistrySchemaFetcher {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `*.schema.json` file in `dir`.
    ///
    /// Each document is registered under `<base_uri><filename>`, under its
    /// own `$id` if it has one, and under the bare filename.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Io`] if the directory or a file cannot be read
    /// and [`FetchError::Parse`] if a file is not valid JSON.
    pub fn from_dir(dir: impl AsRef<Path>, base_uri: &str) -> Result<Self, FetchError> {
        let dir = dir.as_ref();
        let io_err = |source| FetchError::Io {
            location: dir.display().to_string(),
            source,
        };
        let mut registry = Self::new();

        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.ends_with(".schema.json") {
                continue;
            }
            let document = load_document(&path)?;
            registry.insert(name, document.clone());
            registry.insert(format!("{base_uri}{name}"), document);
        }

        tracing::debug!(dir = %dir.display(), count = registry.len(), "loaded schema registry");
        Ok(registry)
    }

    /// Register `document` under `uri`, and under its `$id` if present.
    pub fn insert(&mut self, uri: impl Into<String>, document: Value) -> &mut Self {
        let map = Arc::make_mut(&mut self.schemas_by_uri);
        if let Some(id) = document.get("$id").and_then(Value::as_str) {
            map.insert(id.to_string(), document.clone());
        }
        map.insert(uri.into(), document);
        self
    }

    /// Number of registered URIs (aliases counted separately).
    pub fn len(&self) -> usize {
        self.schemas_by_uri.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.schemas_by_uri.is_empty()
    }
}

impl SchemaFetcher for RegistrySchemaFetcher {
    fn fetch(&self, uri: &Url) -> Result<Option<Schema>, FetchError> {
        let Some(document) = resolve_in(&self.schemas_by_uri, uri.as_str()) else {
            return Ok(None);
        };
        let schema = Schema::new(document.clone()).map_err(|source| FetchError::Schema {
            location: uri.to_string(),
            source,
        })?;
        Ok(Some(
            schema
                .with_uri(uri.clone())
                .with_resources(Arc::clone(&self.schemas_by_uri)),
        ))
    }
}

/// Look `uri` up in a URI-keyed document map: direct hit, then bare
/// filename, then any key ending in `/<filename>`. The last step only
/// answers when every such key holds the same document.
pub(crate) fn resolve_in<'a>(map: &'a HashMap<String, Value>, uri: &str) -> Option<&'a Value> {
    let uri = uri.split('#').next().unwrap_or(uri);
    if let Some(value) = map.get(uri) {
        return Some(value);
    }

    let filename = uri.rsplit('/').next().unwrap_or(uri);
    if filename.is_empty() {
        return None;
    }
    if let Some(value) = map.get(filename) {
        return Some(value);
    }

    let suffix = format!("/{filename}");
    let mut candidates = map
        .iter()
        .filter(|(key, _)| key.ends_with(&suffix))
        .map(|(_, value)| value);
    let first = candidates.next()?;
    if candidates.all(|other| other == first) {
        Some(first)
    } else {
        tracing::debug!(uri, filename, "ambiguous filename match, not resolving");
        None
    }
}

/// Read a JSON or YAML document from disk. YAML is chosen by a `.yaml` or
/// `.yml` extension; anything else is parsed as JSON.
///
/// # Errors
///
/// Returns [`FetchError::Io`] if the file cannot be read and
/// [`FetchError::Parse`] if its content does not parse.
pub fn load_document(path: &Path) -> Result<Value, FetchError> {
    let location = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| FetchError::Io {
        location: location.clone(),
        source,
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| FetchError::Parse {
            location,
            reason: format!("invalid YAML: {e}"),
        }),
        _ => serde_json::from_str(&content).map_err(|e| FetchError::Parse {
            location,
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Named, ordered collection of fetchers.
///
/// Registration order is fallback priority. Re-registering an existing
/// name replaces that fetcher in place, keeping its position.
///
/// Mutation takes `&mut self`; there is no internal locking.
#[derive(Default)]
pub struct SchemaFetchers {
    entries: Vec<(String, Box<dyn SchemaFetcher>)>,
}

impl SchemaFetchers {
    /// An empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain holding only [`FileSchemaFetcher`] under [`DEFAULT_FETCHER`].
    pub fn with_default() -> Self {
        let mut fetchers = Self::new();
        fetchers.insert(DEFAULT_FETCHER, FileSchemaFetcher);
        fetchers
    }

    /// Register `fetcher` under `name`. Returns the fetcher it replaced.
    pub fn insert<F>(&mut self, name: impl Into<String>, fetcher: F) -> Option<Box<dyn SchemaFetcher>>
    where
        F: SchemaFetcher + 'static,
    {
        let name = name.into();
        let fetcher: Box<dyn SchemaFetcher> = Box::new(fetcher);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, fetcher)),
            None => {
                self.entries.push((name, fetcher));
                None
            }
        }
    }

    /// Fetcher registered under `name`.
    pub fn get(&self, name: &str) -> Option<&dyn SchemaFetcher> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f.as_ref())
    }

    /// Unregister `name`.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn SchemaFetcher>> {
        let pos = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// The fetcher registered under [`DEFAULT_FETCHER`].
    pub fn default_fetcher(&self) -> Option<&dyn SchemaFetcher> {
        self.get(DEFAULT_FETCHER)
    }

    /// Register `fetcher` under [`DEFAULT_FETCHER`].
    pub fn set_default<F>(&mut self, fetcher: F) -> Option<Box<dyn SchemaFetcher>>
    where
        F: SchemaFetcher + 'static,
    {
        self.insert(DEFAULT_FETCHER, fetcher)
    }

    /// Replace the whole chain with `other`.
    pub fn replace_all(&mut self, other: SchemaFetchers) {
        self.entries = other.entries;
    }

    /// Registered names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Number of registered fetchers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no fetcher is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the fallback chain for `uri`.
    pub fn fetch_first(&self, uri: &Url) -> Option<Schema> {
        for (name, fetcher) in &self.entries {
            tracing::debug!(fetcher = %name, %uri, "trying schema fetcher");
            match fetcher.fetch(uri) {
                Ok(Some(schema)) => {
                    tracing::debug!(fetcher = %name, %uri, "schema fetched");
                    return Some(schema);
                }
                Ok(None) => tracing::debug!(fetcher = %name, %uri, "fetcher has no schema"),
                Err(e) => tracing::warn!(fetcher = %name, %uri, "schema fetch failed: {e}"),
            }
        }
        None
    }
}

impl fmt::Debug for SchemaFetchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::schema::SchemaType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn uri(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn declines(_: &Url) -> Result<Option<Schema>, FetchError> {
        Ok(None)
    }

    fn fails(uri: &Url) -> Result<Option<Schema>, FetchError> {
        Err(FetchError::InvalidPath {
            uri: uri.to_string(),
        })
    }

    fn serves_string(_: &Url) -> Result<Option<Schema>, FetchError> {
        Ok(Some(Schema::new(json!({"type": "string"})).unwrap()))
    }

    #[test]
    fn test_empty_chain_yields_none() {
        assert!(SchemaFetchers::new()
            .fetch_first(&uri("https://example.com/a.json"))
            .is_none());
    }

    #[test]
    fn test_errors_and_declines_fall_through() {
        let mut chain = SchemaFetchers::new();
        chain.insert("broken", fails);
        chain.insert("empty", declines);
        chain.insert("good", serves_string);
        let schema = chain.fetch_first(&uri("https://example.com/a.json")).unwrap();
        assert_eq!(schema.document(), &json!({"type": "string"}));
    }

    #[test]
    fn test_first_hit_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut chain = SchemaFetchers::new();
        chain.insert("first", serves_string);
        chain.insert(
            "second",
            move |_: &Url| -> Result<Option<Schema>, FetchError> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            },
        );
        assert!(chain.fetch_first(&uri("https://example.com/a.json")).is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut chain = SchemaFetchers::with_default();
        chain.insert("registry", RegistrySchemaFetcher::new());
        assert!(chain.set_default(declines).is_some());
        assert_eq!(chain.names().collect::<Vec<_>>(), vec![DEFAULT_FETCHER, "registry"]);
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_replace_all_and_remove() {
        let mut chain = SchemaFetchers::with_default();
        let mut other = SchemaFetchers::new();
        other.insert("a", declines);
        other.insert("b", declines);
        chain.replace_all(other);
        assert!(chain.default_fetcher().is_none());
        assert!(chain.remove("a").is_some());
        assert!(chain.remove("a").is_none());
        assert_eq!(chain.names().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_file_fetcher_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("a.schema.json");
        std::fs::write(&json_path, r#"{"type":"boolean"}"#).unwrap();
        let yaml_path = dir.path().join("b.yaml");
        std::fs::write(&yaml_path, "type: integer\nminimum: 3\n").unwrap();

        let fetcher = FileSchemaFetcher;
        let a_uri = Url::from_file_path(&json_path).unwrap();
        let a = fetcher.fetch(&a_uri).unwrap().unwrap();
        assert_eq!(a.uri(), Some(&a_uri));
        assert_eq!(a.document(), &json!({"type": "boolean"}));

        let b = fetcher
            .fetch(&Url::from_file_path(&yaml_path).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(b.minimum(), Some(3.0));
    }

    #[test]
    fn test_file_fetcher_declines_other_schemes_and_reports_missing_files() {
        let fetcher = FileSchemaFetcher;
        assert!(fetcher.fetch(&uri("https://example.com/a.json")).unwrap().is_none());

        let dir = tempfile::tempdir().unwrap();
        let missing = Url::from_file_path(dir.path().join("missing.json")).unwrap();
        assert!(matches!(fetcher.fetch(&missing), Err(FetchError::Io { .. })));
    }

    #[test]
    fn test_file_fetcher_rejects_non_schema_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        std::fs::write(&path, "[1,2]").unwrap();
        let result = FileSchemaFetcher.fetch(&Url::from_file_path(&path).unwrap());
        assert!(matches!(result, Err(FetchError::Schema { .. })));
    }

    #[test]
    fn test_registry_lookup_by_uri_id_and_filename() {
        let mut registry = RegistrySchemaFetcher::new();
        registry.insert(
            "https://schemas.example.com/v1/person.schema.json",
            json!({"$id": "urn:person", "type": "object"}),
        );

        for u in [
            "https://schemas.example.com/v1/person.schema.json",
            "https://mirror.example.org/other/person.schema.json",
            "urn:person",
        ] {
            let schema = registry.fetch(&uri(u)).unwrap();
            assert!(schema.is_some(), "expected a hit for {u}");
        }
        assert!(registry
            .fetch(&uri("https://schemas.example.com/v1/unknown.schema.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_registry_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.schema.json"), r#"{"type":"string"}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let registry =
            RegistrySchemaFetcher::from_dir(dir.path(), "https://schemas.example.com/").unwrap();
        assert_eq!(registry.len(), 2);
        let schema = registry
            .fetch(&uri("https://schemas.example.com/a.schema.json"))
            .unwrap()
            .unwrap();
        assert_eq!(schema.resources().len(), 2);
    }

    #[test]
    fn test_registry_from_dir_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.schema.json"), "{").unwrap();
        let result = RegistrySchemaFetcher::from_dir(dir.path(), "https://x/");
        assert!(matches!(result, Err(FetchError::Parse { .. })));
    }

    #[test]
    fn test_load_yaml_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yml");
        std::fs::write(&path, "a: 1\nb: [true, 2.5, null]\nc: {d: text}\n").unwrap();
        assert_eq!(
            load_document(&path).unwrap(),
            json!({"a": 1, "b": [true, 2.5, null], "c": {"d": "text"}})
        );

        std::fs::write(&path, "a: [unclosed\n").unwrap();
        assert!(matches!(load_document(&path), Err(FetchError::Parse { .. })));
    }

    #[test]
    fn test_ambiguous_filename_does_not_resolve() {
        let mut registry = RegistrySchemaFetcher::new();
        registry.insert("https://a.example.com/shared.schema.json", json!({"type": "string"}));
        registry.insert("https://b.example.com/shared.schema.json", json!({"type": "integer"}));

        let direct = registry
            .fetch(&uri("https://b.example.com/shared.schema.json"))
            .unwrap()
            .unwrap();
        assert_eq!(direct.schema_type(), Some(SchemaType::Integer));
        assert!(registry
            .fetch(&uri("https://c.example.com/shared.schema.json"))
            .unwrap()
            .is_none());

        // Aliases of one document are not ambiguous.
        let mut aliased = RegistrySchemaFetcher::new();
        aliased.insert("https://a.example.com/one.schema.json", json!({"type": "null"}));
        aliased.insert("https://b.example.com/one.schema.json", json!({"type": "null"}));
        assert!(aliased
            .fetch(&uri("https://c.example.com/one.schema.json"))
            .unwrap()
            .is_some());
    }
}
