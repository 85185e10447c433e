//! # Schema Model
//!
//! A [`Schema`] is a JSON Schema document (an object or a boolean) plus the
//! URI it was fetched from and the sibling documents it may `$ref`.
//!
//! Only the keywords that drive generation are surfaced as typed accessors.
//! Everything else stays in the raw document and is enforced by the
//! compiled validator.
//!
//! Two schemas are equal when their documents and source URIs are equal.
//! Cloning is cheap: the document, the resource map, and the compiled
//! default validator are shared.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use jsonsmith_core::{parse_text, ElementError, ElementKind};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::validate::{JsonSchemaValidator, Validator};

/// Primitive type discriminator from the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// `"null"`
    Null,
    /// `"boolean"`
    Boolean,
    /// `"integer"`
    Integer,
    /// `"number"`
    Number,
    /// `"string"`
    String,
    /// `"array"`
    Array,
    /// `"object"`
    Object,
}

impl SchemaType {
    /// Parse a `type` keyword value.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// The `type` keyword for this discriminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error constructing a [`Schema`].
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema text is not valid JSON.
    #[error("schema text is not valid JSON: {0}")]
    Element(#[from] ElementError),

    /// The document is valid JSON but cannot be a schema.
    #[error("schema document must be an object or a boolean, found {found}")]
    NotASchema {
        /// Kind of the element that was supplied.
        found: ElementKind,
    },
}

/// A JSON Schema document.
#[derive(Clone)]
pub struct Schema {
    document: Arc<Value>,
    uri: Option<Url>,
    resources: Arc<HashMap<String, Value>>,
    default_validator: Arc<OnceLock<Option<Arc<JsonSchemaValidator>>>>,
}

impl Schema {
    /// Wrap a schema document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::NotASchema`] unless the document is an object
    /// or a boolean.
    pub fn new(document: Value) -> Result<Self, SchemaError> {
        match document {
            Value::Object(_) | Value::Bool(_) => Ok(Self {
                document: Arc::new(document),
                uri: None,
                resources: Arc::default(),
                default_validator: Arc::default(),
            }),
            other => Err(SchemaError::NotASchema {
                found: ElementKind::of(&other),
            }),
        }
    }

    /// Parse a schema from its text form.
    pub fn from_text(text: &str) -> Result<Self, SchemaError> {
        Self::new(parse_text(text)?)
    }

    /// The empty schema, which accepts any instance.
    pub fn any() -> Self {
        Self {
            document: Arc::new(Value::Object(Map::new())),
            uri: None,
            resources: Arc::default(),
            default_validator: Arc::default(),
        }
    }

    /// Attach the URI this schema was resolved from.
    pub fn with_uri(mut self, uri: Url) -> Self {
        self.uri = Some(uri);
        self.default_validator = Arc::default();
        self
    }

    /// Attach documents that `$ref`s in this schema may resolve against,
    /// keyed by URI or bare filename.
    pub fn with_resources(mut self, resources: Arc<HashMap<String, Value>>) -> Self {
        self.resources = resources;
        self.default_validator = Arc::default();
        self
    }

    /// The raw schema document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// URI the schema was resolved from, if known.
    pub fn uri(&self) -> Option<&Url> {
        self.uri.as_ref()
    }

    /// Documents available for `$ref` resolution.
    pub fn resources(&self) -> &HashMap<String, Value> {
        &self.resources
    }

    /// Short human-readable name: the URI, else the title, else the `$id`.
    pub fn label(&self) -> String {
        if let Some(uri) = &self.uri {
            return uri.to_string();
        }
        self.title()
            .or_else(|| self.str_keyword("$id"))
            .unwrap_or("<anonymous>")
            .to_string()
    }

    /// The `title` keyword.
    pub fn title(&self) -> Option<&str> {
        self.str_keyword("title")
    }

    /// The primitive type discriminator.
    ///
    /// When `type` is an array (e.g. `["string", "null"]`) the first
    /// non-null entry is used; `["null"]` alone yields [`SchemaType::Null`].
    pub fn schema_type(&self) -> Option<SchemaType> {
        match self.keyword("type")? {
            Value::String(s) => SchemaType::from_keyword(s),
            Value::Array(types) => {
                let mut parsed = types
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(SchemaType::from_keyword);
                let first = parsed.next()?;
                if first == SchemaType::Null {
                    Some(parsed.next().unwrap_or(SchemaType::Null))
                } else {
                    Some(first)
                }
            }
            _ => None,
        }
    }

    /// The `format` keyword.
    pub fn format(&self) -> Option<&str> {
        self.str_keyword("format")
    }

    /// The `enum` keyword.
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.keyword("enum")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    /// Declared properties in declaration order. Entries whose sub-schema is
    /// not a valid schema document are skipped.
    pub fn properties(&self) -> Vec<(&str, Schema)> {
        let Some(props) = self.keyword("properties").and_then(Value::as_object) else {
            return Vec::new();
        };
        props
            .iter()
            .filter_map(|(name, doc)| self.child(doc).map(|s| (name.as_str(), s)))
            .collect()
    }

    /// Names listed under `required`.
    pub fn required(&self) -> Vec<&str> {
        self.keyword("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Item schema. For the tuple form (`items` as an array) the first
    /// entry is returned.
    pub fn items(&self) -> Option<Schema> {
        match self.keyword("items")? {
            Value::Array(tuple) => tuple.first().and_then(|doc| self.child(doc)),
            doc => self.child(doc),
        }
    }

    /// The `minimum` keyword.
    pub fn minimum(&self) -> Option<f64> {
        self.keyword("minimum").and_then(Value::as_f64)
    }

    /// The `maximum` keyword.
    pub fn maximum(&self) -> Option<f64> {
        self.keyword("maximum").and_then(Value::as_f64)
    }

    /// The `minLength` keyword.
    pub fn min_length(&self) -> Option<u64> {
        self.keyword("minLength").and_then(Value::as_u64)
    }

    /// The `maxLength` keyword.
    pub fn max_length(&self) -> Option<u64> {
        self.keyword("maxLength").and_then(Value::as_u64)
    }

    /// The `minItems` keyword.
    pub fn min_items(&self) -> Option<u64> {
        self.keyword("minItems").and_then(Value::as_u64)
    }

    /// The `maxItems` keyword.
    pub fn max_items(&self) -> Option<u64> {
        self.keyword("maxItems").and_then(Value::as_u64)
    }

    /// The validator this schema implies: the document compiled with the
    /// `jsonschema` crate. Compiled once per schema and shared by clones.
    ///
    /// Returns `None` if the document does not compile.
    pub fn default_validator(&self) -> Option<Arc<dyn Validator>> {
        let compiled = self
            .default_validator
            .get_or_init(|| match JsonSchemaValidator::new(self) {
                Ok(validator) => Some(Arc::new(validator)),
                Err(e) => {
                    tracing::warn!(schema = %self.label(), "schema has no default validator: {e}");
                    None
                }
            });
        compiled.clone().map(|v| v as Arc<dyn Validator>)
    }

    fn keyword(&self, name: &str) -> Option<&Value> {
        self.document.as_object().and_then(|o| o.get(name))
    }

    fn str_keyword(&self, name: &str) -> Option<&str> {
        self.keyword(name).and_then(Value::as_str)
    }

    fn child(&self, document: &Value) -> Option<Schema> {
        Schema::new(document.clone())
            .ok()
            .map(|s| s.with_resources(Arc::clone(&self.resources)))
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document && self.uri == other.uri
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("uri", &self.uri.as_ref().map(Url::as_str))
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(doc: Value) -> Schema {
        Schema::new(doc).unwrap()
    }

    #[test]
    fn test_rejects_non_schema_documents() {
        for doc in [json!(1), json!("x"), json!([]), json!(null)] {
            assert!(matches!(
                Schema::new(doc),
                Err(SchemaError::NotASchema { .. })
            ));
        }
        assert!(Schema::new(json!(true)).is_ok());
    }

    #[test]
    fn test_from_text_reports_parse_error() {
        assert!(matches!(
            Schema::from_text("{"),
            Err(SchemaError::Element(_))
        ));
    }

    #[test]
    fn test_schema_type_simple_and_union() {
        assert_eq!(schema(json!({"type": "number"})).schema_type(), Some(SchemaType::Number));
        assert_eq!(
            schema(json!({"type": ["null", "string"]})).schema_type(),
            Some(SchemaType::String)
        );
        assert_eq!(schema(json!({"type": ["null"]})).schema_type(), Some(SchemaType::Null));
        assert_eq!(schema(json!({"type": "bogus"})).schema_type(), None);
        assert_eq!(schema(json!({})).schema_type(), None);
        assert_eq!(schema(json!(true)).schema_type(), None);
    }

    #[test]
    fn test_properties_keep_declaration_order() {
        let s = Schema::from_text(
            r#"{"type":"object","properties":{"z":{"type":"string"},"a":{"type":"boolean"},"bad":3}}"#,
        )
        .unwrap();
        let names: Vec<&str> = s.properties().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["z", "a"]);
        assert_eq!(s.properties()[1].1.schema_type(), Some(SchemaType::Boolean));
    }

    #[test]
    fn test_items_object_and_tuple_forms() {
        let single = schema(json!({"type": "array", "items": {"type": "integer"}}));
        assert_eq!(single.items().unwrap().schema_type(), Some(SchemaType::Integer));
        let tuple = schema(json!({"items": [{"type": "string"}, {"type": "null"}]}));
        assert_eq!(tuple.items().unwrap().schema_type(), Some(SchemaType::String));
        assert!(schema(json!({"type": "array"})).items().is_none());
    }

    #[test]
    fn test_constraint_accessors() {
        let s = schema(json!({
            "minimum": 1.5, "maximum": 10,
            "minLength": 2, "maxLength": 8,
            "minItems": 0, "maxItems": 3,
            "format": "time", "title": "T",
            "enum": ["a", "b"], "required": ["x", 7, "y"]
        }));
        assert_eq!(s.minimum(), Some(1.5));
        assert_eq!(s.maximum(), Some(10.0));
        assert_eq!(s.min_length(), Some(2));
        assert_eq!(s.max_length(), Some(8));
        assert_eq!(s.min_items(), Some(0));
        assert_eq!(s.max_items(), Some(3));
        assert_eq!(s.format(), Some("time"));
        assert_eq!(s.title(), Some("T"));
        assert_eq!(s.enum_values().map(<[Value]>::len), Some(2));
        assert_eq!(s.required(), vec!["x", "y"]);
    }

    #[test]
    fn test_equality_uses_document_and_uri() {
        let uri = Url::parse("file:///tmp/a.schema.json").unwrap();
        let a = schema(json!({"type": "string"}));
        let b = schema(json!({"type": "string"}));
        assert_eq!(a, b);
        assert_ne!(a.clone().with_uri(uri.clone()), b.clone());
        assert_eq!(a.with_uri(uri.clone()), b.with_uri(uri));
    }

    #[test]
    fn test_label_prefers_uri_then_title() {
        let s = schema(json!({"title": "Person"}));
        assert_eq!(s.label(), "Person");
        let s = s.with_uri(Url::parse("https://example.com/p.json").unwrap());
        assert_eq!(s.label(), "https://example.com/p.json");
        assert_eq!(Schema::any().label(), "<anonymous>");
    }

    #[test]
    fn test_default_validator_is_shared_by_clones() {
        let s = schema(json!({"type": "string"}));
        let clone = s.clone();
        let a = s.default_validator().unwrap();
        let b = clone.default_validator().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_valid(&json!("ok")));
        assert!(!a.is_valid(&json!(1)));
    }

    #[test]
    fn test_default_validator_absent_for_uncompilable_schema() {
        let s = schema(json!({"type": 12}));
        assert!(s.default_validator().is_none());
    }
}
