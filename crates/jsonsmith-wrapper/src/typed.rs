//! # Typed Object Projection
//!
//! [`TypedJsonObject<T>`] views a wrapped JSON object whose values all
//! share one domain type `T`. It never stores `T`: reads convert the
//! current element through an [`ElementConverter`], writes convert back
//! into the element. The wrapped element stays the single source of truth,
//! so edits made through [`TypedJsonObject::wrapper_mut`] are observed by
//! the next read.
//!
//! Entry order is the object's insertion order; positional access
//! ([`get_value_at`](TypedJsonObject::get_value_at),
//! [`key_at`](TypedJsonObject::key_at)) relies on it.

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;

use indexmap::IndexMap;
use jsonsmith_core::{as_object, as_object_mut, key_at, JsonObject};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypedObjectError;
use crate::wrapper::JsonElementWrapper;

/// Two-way conversion between an element and a domain value.
pub trait ElementConverter<T> {
    /// Conversion failure.
    type Error: fmt::Display;

    /// Decode the element stored under `key`.
    fn from_element(&self, element: &Value, key: &str) -> Result<T, Self::Error>;

    /// Encode a value as an element.
    fn to_element(&self, value: &T) -> Result<Value, Self::Error>;
}

/// Converter backed by `T`'s serde implementations.
pub struct SerdeConverter<T>(PhantomData<fn() -> T>);

impl<T> Default for SerdeConverter<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T> Clone for SerdeConverter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SerdeConverter<T> {}

impl<T> fmt::Debug for SerdeConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SerdeConverter")
    }
}

impl<T> ElementConverter<T> for SerdeConverter<T>
where
    T: Serialize + DeserializeOwned,
{
    type Error = serde_json::Error;

    fn from_element(&self, element: &Value, _key: &str) -> Result<T, Self::Error> {
        T::deserialize(element)
    }

    fn to_element(&self, value: &T) -> Result<Value, Self::Error> {
        serde_json::to_value(value)
    }
}

/// Typed view of a wrapped JSON object.
pub struct TypedJsonObject<T, C = SerdeConverter<T>> {
    wrapper: JsonElementWrapper,
    converter: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> TypedJsonObject<T, C>
where
    C: ElementConverter<T> + Default,
{
    /// View `wrapper` through the default converter.
    ///
    /// # Errors
    ///
    /// [`TypedObjectError::NotAnObject`] unless the element is an object.
    pub fn new(wrapper: JsonElementWrapper) -> Result<Self, TypedObjectError> {
        Self::with_converter(wrapper, C::default())
    }

    /// Wrap `json` in a fresh [`JsonElementWrapper`] and view it.
    pub fn from_value(json: Value) -> Result<Self, TypedObjectError> {
        Self::new(JsonElementWrapper::new(json))
    }
}

impl<T, C> TypedJsonObject<T, C>
where
    C: ElementConverter<T>,
{
    /// View `wrapper` through `converter`.
    ///
    /// # Errors
    ///
    /// [`TypedObjectError::NotAnObject`] unless the element is an object.
    pub fn with_converter(wrapper: JsonElementWrapper, converter: C) -> Result<Self, TypedObjectError> {
        as_object(wrapper.json())?;
        Ok(Self {
            wrapper,
            converter,
            _marker: PhantomData,
        })
    }

    fn object(&self) -> Result<&JsonObject, TypedObjectError> {
        Ok(as_object(self.wrapper.json())?)
    }

    fn object_mut(&mut self) -> Result<&mut JsonObject, TypedObjectError> {
        Ok(as_object_mut(self.wrapper.json_mut())?)
    }

    fn decode(&self, key: &str, element: &Value) -> Result<T, TypedObjectError> {
        self.converter
            .from_element(element, key)
            .map_err(|e| TypedObjectError::Malformed {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    /// Value under `key`.
    ///
    /// # Errors
    ///
    /// [`TypedObjectError::NotFound`] if the key is absent,
    /// [`TypedObjectError::Malformed`] if the element does not convert.
    pub fn get_value(&self, key: &str) -> Result<T, TypedObjectError> {
        let element = self.object()?.get(key).ok_or_else(|| TypedObjectError::NotFound {
            key: key.to_string(),
        })?;
        self.decode(key, element)
    }

    /// Value under `key`, or `None` if it is absent or does not convert.
    pub fn opt_value(&self, key: &str) -> Option<T> {
        self.get_value(key).ok()
    }

    /// Value at insertion position `pos`.
    ///
    /// # Errors
    ///
    /// [`TypedObjectError::IndexOutOfBounds`] past the last entry,
    /// [`TypedObjectError::Malformed`] if the element does not convert.
    pub fn get_value_at(&self, pos: usize) -> Result<T, TypedObjectError> {
        let object = self.object()?;
        let (key, element) = object
            .iter()
            .nth(pos)
            .ok_or(TypedObjectError::IndexOutOfBounds {
                pos,
                len: object.len(),
            })?;
        self.decode(key, element)
    }

    /// Key at insertion position `pos`.
    pub fn key_at(&self, pos: usize) -> Option<&str> {
        self.object().ok().and_then(|object| key_at(object, pos))
    }

    /// Store `value` under `key`, replacing any existing entry in place.
    pub fn put_value(&mut self, key: impl Into<String>, value: &T) -> Result<(), TypedObjectError> {
        let key = key.into();
        let element = self
            .converter
            .to_element(value)
            .map_err(|e| TypedObjectError::Malformed {
                key: key.clone(),
                reason: e.to_string(),
            })?;
        self.object_mut()?.insert(key, element);
        Ok(())
    }

    /// Store every entry of `entries`, in order. Stops at the first entry
    /// that fails to convert; earlier entries stay stored.
    pub fn put_all<K, I>(&mut self, entries: I) -> Result<(), TypedObjectError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        for (key, value) in entries {
            self.put_value(key, &value)?;
        }
        Ok(())
    }

    /// Remove the entry under `key`, returning its element. Later entries
    /// keep their relative order.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, TypedObjectError> {
        Ok(self.object_mut()?.shift_remove(key))
    }

    /// Keep only the entries for which `keep` returns true.
    ///
    /// Every value is converted before anything is removed, so a conversion
    /// failure leaves the object untouched.
    pub fn retain<F>(&mut self, mut keep: F) -> Result<(), TypedObjectError>
    where
        F: FnMut(&str, &T) -> bool,
    {
        let mut dropped = HashSet::new();
        for (key, element) in self.object()? {
            let value = self.decode(key, element)?;
            if !keep(key, &value) {
                dropped.insert(key.clone());
            }
        }
        if !dropped.is_empty() {
            self.object_mut()?.retain(|key, _| !dropped.contains(key));
        }
        Ok(())
    }

    /// Lazy iterator over `(key, value)` pairs in insertion order. Each
    /// value is converted when reached. Yields nothing if the wrapped
    /// element is no longer an object.
    pub fn iter(&self) -> Iter<'_, T, C> {
        Iter {
            entries: self.object().ok().map(|object| object.iter()),
            converter: &self.converter,
            _marker: PhantomData,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.object().map(JsonObject::len).unwrap_or(0)
    }

    /// Returns true if the object has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fresh map of every entry, in insertion order.
    pub fn get_entries(&self) -> Result<IndexMap<String, T>, TypedObjectError> {
        self.object()?;
        self.iter()
            .map(|entry| entry.map(|(key, value)| (key.to_string(), value)))
            .collect()
    }

    /// The underlying wrapper.
    pub fn wrapper(&self) -> &JsonElementWrapper {
        &self.wrapper
    }

    /// Mutable access to the underlying wrapper.
    pub fn wrapper_mut(&mut self) -> &mut JsonElementWrapper {
        &mut self.wrapper
    }

    /// Unwrap the underlying wrapper.
    pub fn into_wrapper(self) -> JsonElementWrapper {
        self.wrapper
    }
}

impl<T, C> fmt::Debug for TypedJsonObject<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedJsonObject")
            .field("wrapper", &self.wrapper)
            .finish_non_exhaustive()
    }
}

impl<T, C> fmt::Display for TypedJsonObject<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.wrapper, f)
    }
}

/// Iterator returned by [`TypedJsonObject::iter`].
pub struct Iter<'a, T, C> {
    entries: Option<serde_json::map::Iter<'a>>,
    converter: &'a C,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T, C> Iterator for Iter<'a, T, C>
where
    C: ElementConverter<T>,
{
    type Item = Result<(&'a str, T), TypedObjectError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (key, element) = self.entries.as_mut()?.next()?;
        let entry = self
            .converter
            .from_element(element, key)
            .map(|value| (key.as_str(), value))
            .map_err(|e| TypedObjectError::Malformed {
                key: key.clone(),
                reason: e.to_string(),
            });
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries
            .as_ref()
            .map_or((0, Some(0)), Iterator::size_hint)
    }
}

impl<'a, T, C> IntoIterator for &'a TypedJsonObject<T, C>
where
    C: ElementConverter<T>,
{
    type Item = Result<(&'a str, T), TypedObjectError>;
    type IntoIter = Iter<'a, T, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C> Serialize for TypedJsonObject<T, C> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.wrapper.serialize(serializer)
    }
}

impl<'de, T, C> Deserialize<'de> for TypedJsonObject<T, C>
where
    C: ElementConverter<T> + Default,
{
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wrapper = JsonElementWrapper::deserialize(deserializer)?;
        Self::new(wrapper).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Price {
        amount: u32,
        currency: String,
    }

    fn price(amount: u32) -> Price {
        Price {
            amount,
            currency: "EUR".to_string(),
        }
    }

    fn prices() -> TypedJsonObject<Price> {
        TypedJsonObject::from_value(json!({
            "apple": {"amount": 3, "currency": "EUR"},
            "pear": {"amount": 5, "currency": "EUR"},
            "fig": {"amount": 9, "currency": "EUR"}
        }))
        .unwrap()
    }

    /// Decodes strings as their length.
    #[derive(Debug, Default)]
    struct LengthConverter;

    impl ElementConverter<usize> for LengthConverter {
        type Error = String;

        fn from_element(&self, element: &Value, key: &str) -> Result<usize, String> {
            element
                .as_str()
                .map(str::len)
                .ok_or_else(|| format!("'{key}' is not a string"))
        }

        fn to_element(&self, value: &usize) -> Result<Value, String> {
            Ok(Value::String("x".repeat(*value)))
        }
    }

    #[test]
    fn test_rejects_non_objects() {
        assert!(matches!(
            TypedJsonObject::<Price>::from_value(json!([1])),
            Err(TypedObjectError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_get_value_and_errors() {
        let p = prices();
        assert_eq!(p.get_value("pear").unwrap(), price(5));
        assert!(matches!(
            p.get_value("kiwi"),
            Err(TypedObjectError::NotFound { key }) if key == "kiwi"
        ));

        let mut p = p;
        p.wrapper_mut().json_mut()["bad"] = json!("not a price");
        assert!(matches!(
            p.get_value("bad"),
            Err(TypedObjectError::Malformed { key, .. }) if key == "bad"
        ));
    }

    #[test]
    fn test_opt_value_signals_absence() {
        let mut p = prices();
        assert_eq!(p.opt_value("fig"), Some(price(9)));
        assert_eq!(p.opt_value("kiwi"), None);
        p.wrapper_mut().json_mut()["bad"] = json!(1);
        assert_eq!(p.opt_value("bad"), None);
    }

    #[test]
    fn test_positional_access() {
        let p = prices();
        assert_eq!(p.key_at(0), Some("apple"));
        assert_eq!(p.key_at(2), Some("fig"));
        assert_eq!(p.key_at(3), None);
        assert_eq!(p.get_value_at(1).unwrap(), price(5));
        assert!(matches!(
            p.get_value_at(3),
            Err(TypedObjectError::IndexOutOfBounds { pos: 3, len: 3 })
        ));
    }

    #[test]
    fn test_put_value_writes_through_to_element() {
        let mut p = prices();
        p.put_value("kiwi", &price(1)).unwrap();
        p.put_value("apple", &price(4)).unwrap();
        assert_eq!(
            p.wrapper().json()["kiwi"],
            json!({"amount": 1, "currency": "EUR"})
        );
        // Replacement keeps the original position.
        assert_eq!(p.key_at(0), Some("apple"));
        assert_eq!(p.get_value("apple").unwrap(), price(4));
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn test_put_all_in_order() {
        let mut p = TypedJsonObject::<Price>::from_value(json!({})).unwrap();
        assert!(p.is_empty());
        p.put_all(vec![("b", price(2)), ("a", price(1))]).unwrap();
        let keys: Vec<&str> = p.iter().map(|e| e.unwrap().0).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut p = prices();
        assert_eq!(
            p.remove("apple").unwrap(),
            Some(json!({"amount": 3, "currency": "EUR"}))
        );
        assert_eq!(p.remove("apple").unwrap(), None);
        assert_eq!(p.key_at(0), Some("pear"));
        assert_eq!(p.key_at(1), Some("fig"));
    }

    #[test]
    fn test_retain_removes_underlying_entries() {
        let mut p = prices();
        p.retain(|_, value| value.amount > 4).unwrap();
        assert_eq!(p.wrapper().json(), &json!({
            "pear": {"amount": 5, "currency": "EUR"},
            "fig": {"amount": 9, "currency": "EUR"}
        }));
    }

    #[test]
    fn test_retain_leaves_object_untouched_on_malformed_value() {
        let mut p = prices();
        p.wrapper_mut().json_mut()["bad"] = json!(null);
        assert!(p.retain(|_, _| false).is_err());
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn test_iteration_is_lazy_and_restartable() {
        let mut p = prices();
        p.wrapper_mut().json_mut()["bad"] = json!(false);

        let mut iter = p.iter();
        assert_eq!(iter.size_hint(), (4, Some(4)));
        assert_eq!(iter.next().unwrap().unwrap(), ("apple", price(3)));

        let first_pass: Vec<_> = p.iter().collect();
        let second_pass: Vec<_> = (&p).into_iter().collect();
        assert_eq!(first_pass.len(), 4);
        assert_eq!(second_pass.len(), 4);
        assert!(first_pass[3].is_err());
    }

    #[test]
    fn test_get_entries_is_fresh_ordered_copy() {
        let mut p = prices();
        let entries = p.get_entries().unwrap();
        assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["apple", "pear", "fig"]);
        assert_eq!(entries["fig"], price(9));

        p.put_value("kiwi", &price(1)).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(p.get_entries().unwrap().len(), 4);
    }

    #[test]
    fn test_custom_converter() {
        let wrapper = JsonElementWrapper::new(json!({"a": "xx", "b": "xxxxx"}));
        let mut lengths: TypedJsonObject<usize, LengthConverter> = TypedJsonObject::new(wrapper).unwrap();
        assert_eq!(lengths.get_value("b").unwrap(), 5);
        lengths.put_value("c", &3).unwrap();
        assert_eq!(lengths.wrapper().json()["c"], json!("xxx"));
        assert_eq!(
            lengths.get_entries().unwrap().into_iter().collect::<Vec<_>>(),
            vec![("a".to_string(), 2), ("b".to_string(), 5), ("c".to_string(), 3)]
        );
    }

    #[test]
    fn test_element_is_single_source_of_truth() {
        let mut p = prices();
        p.wrapper_mut().wrap(json!({"only": {"amount": 1, "currency": "USD"}}));
        assert_eq!(p.len(), 1);
        assert_eq!(p.get_value("only").unwrap().currency, "USD");

        p.wrapper_mut().wrap(json!("scalar"));
        assert_eq!(p.len(), 0);
        assert_eq!(p.iter().count(), 0);
        assert!(matches!(
            p.get_entries(),
            Err(TypedObjectError::NotAnObject(_))
        ));
    }

    #[test]
    fn test_persisted_round_trip() {
        let p = prices();
        let text = serde_json::to_string(&p).unwrap();
        let back: TypedJsonObject<Price> = serde_json::from_str(&text).unwrap();
        assert_eq!(back.to_string(), p.to_string());
    }
}
