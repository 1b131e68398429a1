use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of a stored record: field name to value.
///
/// Uses `BTreeMap` so iteration (and therefore logging and serialization)
/// is deterministic.
pub type Fields = BTreeMap<String, Value>;

/// Generic runtime value type for record fields.
///
/// Supports all JSON-compatible types plus binary data. Field validators
/// dispatch on the variant, so "kind" in diagnostics always means the
/// variant name returned by [`Value::kind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON integer (signed 64-bit).
    Int(i64),
    /// JSON floating-point (64-bit IEEE 754).
    Float(f64),
    /// JSON string (UTF-8).
    String(String),
    /// Binary data (not directly representable in JSON).
    Bytes(Vec<u8>),
    /// JSON array (ordered sequence of values).
    Array(Vec<Value>),
    /// JSON object (ordered map of string keys to values).
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Short name of the runtime kind, used in log fields and error text.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    /// Returns the string slice if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value as `f64` if this is an `Int` or a `Float`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Consumes the value and returns its entries if it is a `Map`.
    #[must_use]
    pub fn into_fields(self) -> Option<Fields> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 above i64::MAX and real numbers both land here.
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_object_converts_to_map() {
        let value = Value::from(json!({"name": "Alice", "age": 30, "score": 1.5}));
        let fields = value.into_fields().expect("object converts to map");

        assert_eq!(fields.get("name"), Some(&Value::String("Alice".into())));
        assert_eq!(fields.get("age"), Some(&Value::Int(30)));
        assert_eq!(fields.get("score"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn large_unsigned_becomes_float() {
        let value = Value::from(json!(u64::MAX));
        assert_eq!(value.kind(), "float");
    }

    #[test]
    fn non_object_has_no_fields() {
        assert!(Value::from(json!([1, 2])).into_fields().is_none());
        assert!(Value::Null.into_fields().is_none());
    }

    #[test]
    fn as_f64_only_for_numeric_kinds() {
        assert_eq!(Value::Int(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(-0.5).as_f64(), Some(-0.5));
        assert_eq!(Value::from("3").as_f64(), None);
        assert_eq!(Value::Bool(true).as_f64(), None);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Bytes(vec![1]).kind(), "bytes");
        assert_eq!(Value::Array(vec![]).kind(), "array");
        assert_eq!(Value::Map(BTreeMap::new()).kind(), "map");
    }
}
