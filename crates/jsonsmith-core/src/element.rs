//! # Element Tree — Text Codec and Kinds
//!
//! Canonical text form of an element is the compact JSON rendering produced
//! by `serde_json`. With `preserve_order` enabled, object members render in
//! insertion order, so `parse_text(to_text(v))` reproduces `v` and
//! `to_text(parse_text(s))` reproduces any compact `s` byte for byte.

use std::fmt;

use serde_json::{Map, Value};

use crate::error::ElementError;

/// A JSON object with insertion-ordered, unique keys.
pub type JsonObject = Map<String, Value>;

/// Shape of a JSON element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Any JSON number.
    Number,
    /// A JSON string.
    String,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl ElementKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Lowercase name, matching JSON Schema `type` keywords where one exists.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render an element as its canonical (compact) text form.
pub fn to_text(value: &Value) -> String {
    value.to_string()
}

/// Parse text into an element.
///
/// # Errors
///
/// Returns [`ElementError::Parse`] if the text is not a single well-formed
/// JSON document.
pub fn parse_text(text: &str) -> Result<Value, ElementError> {
    Ok(serde_json::from_str(text)?)
}

/// Borrow a value as an object.
///
/// # Errors
///
/// Returns [`ElementError::NotAnObject`] for any other kind of element.
pub fn as_object(value: &Value) -> Result<&JsonObject, ElementError> {
    value.as_object().ok_or(ElementError::NotAnObject {
        found: ElementKind::of(value),
    })
}

/// Mutably borrow a value as an object.
///
/// # Errors
///
/// Returns [`ElementError::NotAnObject`] for any other kind of element.
pub fn as_object_mut(value: &mut Value) -> Result<&mut JsonObject, ElementError> {
    let found = ElementKind::of(value);
    value.as_object_mut().ok_or(ElementError::NotAnObject { found })
}

/// Key at insertion position `pos`, if any.
///
/// Positions are stable only while the object is not mutated; removal
/// shifts every later key down by one.
pub fn key_at(object: &JsonObject, pos: usize) -> Option<&str> {
    object.keys().nth(pos).map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of_every_variant() {
        assert_eq!(ElementKind::of(&json!(null)), ElementKind::Null);
        assert_eq!(ElementKind::of(&json!(true)), ElementKind::Boolean);
        assert_eq!(ElementKind::of(&json!(1.5)), ElementKind::Number);
        assert_eq!(ElementKind::of(&json!("x")), ElementKind::String);
        assert_eq!(ElementKind::of(&json!([1])), ElementKind::Array);
        assert_eq!(ElementKind::of(&json!({"a": 1})), ElementKind::Object);
    }

    #[test]
    fn test_to_text_is_compact() {
        let value = json!({"a": [1, 2], "b": {"c": null}});
        assert_eq!(to_text(&value), r#"{"a":[1,2],"b":{"c":null}}"#);
    }

    #[test]
    fn test_to_text_keeps_insertion_order() {
        let value = parse_text(r#"{"zeta":1,"alpha":2,"mid":3}"#).unwrap();
        assert_eq!(to_text(&value), r#"{"zeta":1,"alpha":2,"mid":3}"#);
    }

    #[test]
    fn test_parse_text_rejects_malformed() {
        let err = parse_text("{\"a\":").unwrap_err();
        assert!(matches!(err, ElementError::Parse(_)));
        assert!(parse_text("").is_err());
        assert!(parse_text("[1] [2]").is_err());
    }

    #[test]
    fn test_as_object_rejects_array() {
        let value = json!([1, 2, 3]);
        match as_object(&value) {
            Err(ElementError::NotAnObject { found }) => assert_eq!(found, ElementKind::Array),
            other => panic!("expected NotAnObject, got {other:?}"),
        }
    }

    #[test]
    fn test_as_object_mut_allows_insert() {
        let mut value = json!({});
        as_object_mut(&mut value).unwrap().insert("k".into(), json!(1));
        assert_eq!(value, json!({"k": 1}));
    }

    #[test]
    fn test_key_at_follows_insertion_order() {
        let value = parse_text(r#"{"b":1,"a":2}"#).unwrap();
        let object = as_object(&value).unwrap();
        assert_eq!(key_at(object, 0), Some("b"));
        assert_eq!(key_at(object, 1), Some("a"));
        assert_eq!(key_at(object, 2), None);
    }
}
