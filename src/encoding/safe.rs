//! Loss-free two-way encoding between record values and storage values
//!
//! The storage layer accepts scalars, arrays, and JSON documents, but a
//! JSON document cannot hold raw bytes as a plain value. Any bytes nested
//! inside a structured value are therefore replaced, before the value is
//! JSON-contained, by a marker object:
//!
//! ```json
//! {"__type__": "bytes", "encoding": "base64", "data": "<base64 text>"}
//! ```
//!
//! Decode recognizes the marker and inverts it exactly. Top-level byte
//! payloads destined for a binary-array column bypass the tagging and
//! pass through untouched.
//!
//! Invariant: `decode(encode(v)) == v` for every value this pipeline can
//! reach (scalars, nested containers, embedded binary, null).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{Map, Number};

use crate::record::Value;
use crate::schema::{ColumnDef, ScalarShape, StorageType};

use super::errors::{EncodingError, EncodingResult};

/// Marker object keys and tags, fixed by the container format.
pub const MARKER_TYPE_KEY: &str = "__type__";
pub const MARKER_TYPE_BYTES: &str = "bytes";
pub const MARKER_ENCODING_KEY: &str = "encoding";
pub const MARKER_ENCODING_BASE64: &str = "base64";
pub const MARKER_DATA_KEY: &str = "data";

/// A value in the form the storage layer accepts natively.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    /// SQL NULL
    Null,
    /// Integer column value
    Integer(i64),
    /// Boolean column value
    Bool(bool),
    /// Bounded-text column value
    Text(String),
    /// JSON-container column value
    Json(serde_json::Value),
    /// Text-array column value (sub-record identifiers)
    TextArray(Vec<String>),
    /// Binary-array column value (sub-record payloads, untagged)
    BinaryArray(Vec<Vec<u8>>),
}

impl StorageValue {
    /// Returns the variant name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            StorageValue::Null => "null",
            StorageValue::Integer(_) => "integer",
            StorageValue::Bool(_) => "bool",
            StorageValue::Text(_) => "text",
            StorageValue::Json(_) => "json",
            StorageValue::TextArray(_) => "text-array",
            StorageValue::BinaryArray(_) => "binary-array",
        }
    }
}

/// Encodes one record value for the given column.
pub fn encode(value: &Value, column: &ColumnDef) -> EncodingResult<StorageValue> {
    if matches!(value, Value::Null) {
        return Ok(StorageValue::Null);
    }
    match column.storage_type {
        StorageType::IntegerNotNull => match value {
            Value::Int(n) => Ok(StorageValue::Integer(*n)),
            other => Err(shape_mismatch(column, "integer", other)),
        },
        StorageType::Boolean => match value {
            Value::Bool(b) => Ok(StorageValue::Bool(*b)),
            other => Err(shape_mismatch(column, "bool", other)),
        },
        StorageType::JsonContainer => Ok(StorageValue::Json(to_json_safe(value, &column.name)?)),
        StorageType::BoundedText => encode_bounded_text(value, column),
        // Array columns are built by the mapper from the sub-record list;
        // byte payloads pass through untagged
        StorageType::TextArray => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Text(s) => out.push(s.clone()),
                        other => return Err(shape_mismatch(column, "text elements", other)),
                    }
                }
                Ok(StorageValue::TextArray(out))
            }
            other => Err(shape_mismatch(column, "array of text", other)),
        },
        StorageType::BinaryArray => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Binary(b) => out.push(b.clone()),
                        other => return Err(shape_mismatch(column, "binary elements", other)),
                    }
                }
                Ok(StorageValue::BinaryArray(out))
            }
            other => Err(shape_mismatch(column, "array of binary", other)),
        },
    }
}

/// Decodes one storage value back into the record value shape it came
/// from, using the column's storage type and scalar shape hint.
pub fn decode(stored: &StorageValue, column: &ColumnDef) -> EncodingResult<Value> {
    if matches!(stored, StorageValue::Null) {
        return Ok(Value::Null);
    }
    match column.storage_type {
        StorageType::IntegerNotNull => match stored {
            StorageValue::Integer(n) => Ok(Value::Int(*n)),
            other => Err(stored_mismatch(column, "integer", other)),
        },
        StorageType::Boolean => match stored {
            StorageValue::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(stored_mismatch(column, "bool", other)),
        },
        StorageType::JsonContainer => match stored {
            StorageValue::Json(doc) => from_json_safe(doc),
            other => Err(stored_mismatch(column, "json", other)),
        },
        StorageType::BoundedText => match stored {
            StorageValue::Text(s) => decode_bounded_text(s, column),
            other => Err(stored_mismatch(column, "text", other)),
        },
        StorageType::TextArray => match stored {
            StorageValue::TextArray(items) => Ok(Value::Array(
                items.iter().map(|s| Value::Text(s.clone())).collect(),
            )),
            other => Err(stored_mismatch(column, "text-array", other)),
        },
        StorageType::BinaryArray => match stored {
            StorageValue::BinaryArray(items) => Ok(Value::Array(
                items.iter().map(|b| Value::Binary(b.clone())).collect(),
            )),
            other => Err(stored_mismatch(column, "binary-array", other)),
        },
    }
}

fn encode_bounded_text(value: &Value, column: &ColumnDef) -> EncodingResult<StorageValue> {
    match (value, column.shape_hint) {
        (Value::Text(s), _) => Ok(StorageValue::Text(s.clone())),
        (Value::Int(n), Some(ScalarShape::Int)) => Ok(StorageValue::Text(n.to_string())),
        (Value::Float(x), Some(ScalarShape::Float)) => Ok(StorageValue::Text(x.to_string())),
        (other, _) => Err(shape_mismatch(column, "text scalar", other)),
    }
}

fn decode_bounded_text(text: &str, column: &ColumnDef) -> EncodingResult<Value> {
    match column.shape_hint {
        Some(ScalarShape::Int) => text.parse::<i64>().map(Value::Int).map_err(|e| {
            EncodingError::CorruptScalar {
                column: column.name.clone(),
                reason: format!("'{}' is not an integer: {}", text, e),
            }
        }),
        Some(ScalarShape::Float) => text.parse::<f64>().map(Value::Float).map_err(|e| {
            EncodingError::CorruptScalar {
                column: column.name.clone(),
                reason: format!("'{}' is not a float: {}", text, e),
            }
        }),
        _ => Ok(Value::Text(text.to_string())),
    }
}

/// Recursively converts a value into JSON-safe form, tagging embedded
/// bytes with the base64 marker object.
pub fn to_json_safe(value: &Value, column: &str) -> EncodingResult<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Float(x) => serde_json::Value::Number(
            Number::from_f64(*x).ok_or_else(|| EncodingError::NonFiniteFloat(column.into()))?,
        ),
        Value::Text(s) => serde_json::Value::String(s.clone()),
        Value::Binary(bytes) => {
            let mut marker = Map::new();
            marker.insert(
                MARKER_TYPE_KEY.into(),
                serde_json::Value::String(MARKER_TYPE_BYTES.into()),
            );
            marker.insert(
                MARKER_ENCODING_KEY.into(),
                serde_json::Value::String(MARKER_ENCODING_BASE64.into()),
            );
            marker.insert(
                MARKER_DATA_KEY.into(),
                serde_json::Value::String(BASE64.encode(bytes)),
            );
            serde_json::Value::Object(marker)
        }
        Value::Array(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|v| to_json_safe(v, column))
                .collect::<EncodingResult<Vec<_>>>()?,
        ),
        Value::Object(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (k, v) in entries {
                map.insert(k.clone(), to_json_safe(v, column)?);
            }
            serde_json::Value::Object(map)
        }
    })
}

/// Recursively reconstructs the original value shape from JSON-safe form,
/// inverting byte markers exactly.
pub fn from_json_safe(doc: &serde_json::Value) -> EncodingResult<Value> {
    Ok(match doc {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                // Out-of-range integers and all fractional numbers
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Array(items) => Value::Array(
            items
                .iter()
                .map(from_json_safe)
                .collect::<EncodingResult<Vec<_>>>()?,
        ),
        serde_json::Value::Object(map) => {
            if is_bytes_marker(map) {
                return decode_bytes_marker(map);
            }
            let mut entries = Vec::with_capacity(map.len());
            for (k, v) in map {
                entries.push((k.clone(), from_json_safe(v)?));
            }
            Value::Object(entries)
        }
    })
}

fn is_bytes_marker(map: &Map<String, serde_json::Value>) -> bool {
    map.get(MARKER_TYPE_KEY)
        .and_then(|v| v.as_str())
        .map(|t| t == MARKER_TYPE_BYTES)
        .unwrap_or(false)
}

fn decode_bytes_marker(map: &Map<String, serde_json::Value>) -> EncodingResult<Value> {
    let encoding = map
        .get(MARKER_ENCODING_KEY)
        .and_then(|v| v.as_str())
        .ok_or_else(|| EncodingError::MalformedMarker("missing 'encoding' tag".into()))?;
    if encoding != MARKER_ENCODING_BASE64 {
        return Err(EncodingError::MalformedMarker(format!(
            "unsupported encoding '{}'",
            encoding
        )));
    }
    let data = map
        .get(MARKER_DATA_KEY)
        .and_then(|v| v.as_str())
        .ok_or_else(|| EncodingError::MalformedMarker("missing 'data' field".into()))?;
    let bytes = BASE64
        .decode(data)
        .map_err(|e| EncodingError::MalformedMarker(format!("invalid base64: {}", e)))?;
    Ok(Value::Binary(bytes))
}

fn shape_mismatch(column: &ColumnDef, expected: &'static str, actual: &Value) -> EncodingError {
    EncodingError::ShapeMismatch {
        column: column.name.clone(),
        expected,
        actual: actual.shape_name(),
    }
}

fn stored_mismatch(
    column: &ColumnDef,
    expected: &'static str,
    actual: &StorageValue,
) -> EncodingError {
    EncodingError::ShapeMismatch {
        column: column.name.clone(),
        expected,
        actual: actual.kind_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_col(name: &str) -> ColumnDef {
        ColumnDef::new(name, StorageType::BoundedText).with_shape_hint(ScalarShape::Text)
    }

    fn json_col(name: &str) -> ColumnDef {
        ColumnDef::new(name, StorageType::JsonContainer)
    }

    #[test]
    fn test_text_roundtrip() {
        let col = text_col("sequence");
        let v = Value::Text("MKTAYIAK".into());
        let stored = encode(&v, &col).unwrap();
        assert_eq!(decode(&stored, &col).unwrap(), v);
    }

    #[test]
    fn test_null_roundtrip_everywhere() {
        for col in [
            text_col("a"),
            json_col("b"),
            ColumnDef::new("c", StorageType::Boolean),
        ] {
            let stored = encode(&Value::Null, &col).unwrap();
            assert_eq!(stored, StorageValue::Null);
            assert_eq!(decode(&stored, &col).unwrap(), Value::Null);
        }
    }

    #[test]
    fn test_int_scalar_roundtrip_via_shape_hint() {
        let col = ColumnDef::new("exon_count", StorageType::BoundedText)
            .with_shape_hint(ScalarShape::Int);
        let v = Value::Int(-42);
        let stored = encode(&v, &col).unwrap();
        assert_eq!(stored, StorageValue::Text("-42".into()));
        assert_eq!(decode(&stored, &col).unwrap(), v);
    }

    #[test]
    fn test_float_scalar_roundtrip_via_shape_hint() {
        let col = ColumnDef::new("score", StorageType::BoundedText)
            .with_shape_hint(ScalarShape::Float);
        let v = Value::Float(0.1 + 0.2);
        let stored = encode(&v, &col).unwrap();
        assert_eq!(decode(&stored, &col).unwrap(), v);
    }

    #[test]
    fn test_nested_container_roundtrip() {
        let col = json_col("exons");
        let v = Value::Array(vec![
            Value::Object(vec![
                ("start".into(), Value::Int(100)),
                ("end".into(), Value::Int(250)),
            ]),
            Value::Object(vec![
                ("start".into(), Value::Int(300)),
                ("end".into(), Value::Int(410)),
            ]),
        ]);
        let stored = encode(&v, &col).unwrap();
        assert_eq!(decode(&stored, &col).unwrap(), v);
    }

    #[test]
    fn test_embedded_binary_is_tagged() {
        let col = json_col("annotations");
        let v = Value::Object(vec![(
            "raw".into(),
            Value::Binary(vec![0x00, 0x01, 0xFF]),
        )]);
        let stored = encode(&v, &col).unwrap();

        // The JSON form carries the marker, never raw bytes
        let StorageValue::Json(doc) = &stored else {
            panic!("expected json storage value");
        };
        let marker = doc.get("raw").unwrap();
        assert_eq!(marker.get(MARKER_TYPE_KEY).unwrap(), MARKER_TYPE_BYTES);
        assert_eq!(
            marker.get(MARKER_ENCODING_KEY).unwrap(),
            MARKER_ENCODING_BASE64
        );

        assert_eq!(decode(&stored, &col).unwrap(), v);
    }

    #[test]
    fn test_object_key_order_survives_json_container() {
        let col = json_col("meta");
        let v = Value::Object(vec![
            ("zeta".into(), Value::Int(1)),
            ("alpha".into(), Value::Int(2)),
            ("mid".into(), Value::Int(3)),
        ]);
        let stored = encode(&v, &col).unwrap();
        let Value::Object(entries) = decode(&stored, &col).unwrap() else {
            panic!("expected object");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_malformed_base64_marker_fails() {
        let mut marker = Map::new();
        marker.insert(MARKER_TYPE_KEY.into(), MARKER_TYPE_BYTES.into());
        marker.insert(MARKER_ENCODING_KEY.into(), MARKER_ENCODING_BASE64.into());
        marker.insert(MARKER_DATA_KEY.into(), "not%%%base64".into());
        let result = from_json_safe(&serde_json::Value::Object(marker));
        assert!(matches!(result, Err(EncodingError::MalformedMarker(_))));
    }

    #[test]
    fn test_marker_with_unknown_encoding_fails() {
        let mut marker = Map::new();
        marker.insert(MARKER_TYPE_KEY.into(), MARKER_TYPE_BYTES.into());
        marker.insert(MARKER_ENCODING_KEY.into(), "hex".into());
        marker.insert(MARKER_DATA_KEY.into(), "00ff".into());
        let result = from_json_safe(&serde_json::Value::Object(marker));
        assert!(matches!(result, Err(EncodingError::MalformedMarker(_))));
    }

    #[test]
    fn test_binary_array_passthrough_untagged() {
        let col = ColumnDef::new("pdb_files", StorageType::BinaryArray);
        let v = Value::Array(vec![
            Value::Binary(vec![0x00, 0x01]),
            Value::Binary(vec![0xFF]),
        ]);
        let stored = encode(&v, &col).unwrap();
        assert_eq!(
            stored,
            StorageValue::BinaryArray(vec![vec![0x00, 0x01], vec![0xFF]])
        );
        assert_eq!(decode(&stored, &col).unwrap(), v);
    }

    #[test]
    fn test_bool_in_text_column_rejected() {
        let col = text_col("sequence");
        let result = encode(&Value::Bool(true), &col);
        assert!(matches!(result, Err(EncodingError::ShapeMismatch { .. })));
    }
}
