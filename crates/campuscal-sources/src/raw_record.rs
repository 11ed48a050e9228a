//! Raw record type from external sources.
//!
//! A [`RawRecord`] is an unordered key/value mapping with no fixed schema.
//! Values may be text, numbers, nested records or lists of records, and
//! different sources use different keys for the same logical attribute. The
//! adapter owns a record only for the duration of one import call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A heterogeneous key/value record as delivered by a source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON value. Returns `None` unless the value is an object.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Builder method to set a field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value under `key` unless it is absent or null.
    pub fn get_present(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }

    /// Returns the nested record stored under `key`, if the value is an object.
    pub fn get_record(&self, key: &str) -> Option<&Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }

    /// Returns the list stored under `key`, if the value is an array.
    pub fn get_list(&self, key: &str) -> Option<&Vec<Value>> {
        self.get(key).and_then(Value::as_array)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Renders a scalar value as text.
///
/// Strings are returned as-is, numbers and booleans through their JSON
/// rendering. Null, nested records and lists have no text form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_requires_object() {
        assert!(RawRecord::from_json(json!({"id": "1"})).is_some());
        assert!(RawRecord::from_json(json!(["id"])).is_none());
        assert!(RawRecord::from_json(json!("id")).is_none());
    }

    #[test]
    fn builder_and_accessors() {
        let record = RawRecord::new()
            .with("id", "LEG002")
            .with("capacity", 25)
            .with("start", json!({"date": "2024-12-22"}))
            .with("attendees", json!([{"email": "a@u.edu"}]));

        assert_eq!(record.len(), 4);
        assert_eq!(record.get("id"), Some(&json!("LEG002")));
        assert!(record.get_record("start").is_some());
        assert_eq!(record.get_list("attendees").map(Vec::len), Some(1));
        assert!(record.get_record("id").is_none());
    }

    #[test]
    fn null_is_not_present() {
        let record = RawRecord::new().with("title", Value::Null);
        assert!(record.contains_key("title"));
        assert!(record.get_present("title").is_none());
    }

    #[test]
    fn scalar_text_rendering() {
        assert_eq!(scalar_text(&json!("abc")), Some("abc".to_string()));
        assert_eq!(scalar_text(&json!(45)), Some("45".to_string()));
        assert_eq!(scalar_text(&json!(true)), Some("true".to_string()));
        assert_eq!(scalar_text(&Value::Null), None);
        assert_eq!(scalar_text(&json!({"a": 1})), None);
        assert_eq!(scalar_text(&json!([1])), None);
    }

    #[test]
    fn serde_is_transparent() {
        let record: RawRecord = serde_json::from_str(r#"{"summary":"Talk"}"#).unwrap();
        assert_eq!(record.get("summary"), Some(&json!("Talk")));
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"summary":"Talk"}"#);
    }
}
