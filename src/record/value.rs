//! Field value sum type
//!
//! Every field of a record carries one of these shapes. The variant set is
//! deliberately closed: the schema inferencer classifies columns by shape,
//! the safe encoder round-trips each shape losslessly, and the fingerprint
//! hashes each shape with its own domain tag.
//!
//! Object keys preserve insertion order; reconstruction depends on it.

use serde::{Deserialize, Serialize};

/// A single field value.
///
/// `Binary` is the loss-free escape hatch for raw bytes embedded inside
/// structured data. It never travels through a JSON column as a plain
/// value; the safe encoder tags it first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absent / null
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Binary(Vec<u8>),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Ordered mapping from key to value (insertion order preserved)
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Returns the shape name for error messages
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Binary(_) => "binary",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Whether this value is a nested container (array or object)
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Returns the text content if this is a `Text` value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Object lookup by key (first match wins)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}
