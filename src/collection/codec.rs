//! Record payload codec
//!
//! Records travel through the container as JSON bytes produced by the
//! safe encoder: embedded binary (including every sub-record payload)
//! becomes a base64 marker object, so the JSON form is lossless. The
//! header's canonical key order drives reconstruction.

use serde::{Deserialize, Serialize};

use crate::encoding::{from_json_safe, to_json_safe};
use crate::record::{BinarySubrecord, Field, Record, Value};

use super::errors::{CollectionError, CollectionResult};

/// File format magic carried in the header frame.
pub const FORMAT_MAGIC: &str = "proteoflow-collection";
/// Current container format version.
pub const FORMAT_VERSION: u32 = 1;

/// Header frame payload: identifies the format and carries the
/// canonical key order captured from the first record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionHeader {
    pub format: String,
    pub version: u32,
    pub key_order: Vec<String>,
    pub subrecord_field: String,
}

impl CollectionHeader {
    pub fn new(key_order: Vec<String>, subrecord_field: impl Into<String>) -> Self {
        Self {
            format: FORMAT_MAGIC.into(),
            version: FORMAT_VERSION,
            key_order,
            subrecord_field: subrecord_field.into(),
        }
    }

    /// Validates magic and version on read.
    pub fn validate(&self) -> CollectionResult<()> {
        if self.format != FORMAT_MAGIC {
            return Err(CollectionError::Malformed(format!(
                "unexpected format magic '{}'",
                self.format
            )));
        }
        if self.version != FORMAT_VERSION {
            return Err(CollectionError::Malformed(format!(
                "unsupported format version {}",
                self.version
            )));
        }
        Ok(())
    }
}

/// Serializes one record to JSON-safe bytes. Sub-record lists become
/// arrays of `{id, content}` objects with base64-marked content.
pub fn encode_record(record: &Record) -> CollectionResult<Vec<u8>> {
    let mut doc = serde_json::Map::with_capacity(record.len());
    for (name, field) in record.fields() {
        let json_value = match field {
            Field::Value(value) => to_json_safe(value, name)?,
            Field::Subrecords(list) => {
                let mut items = Vec::with_capacity(list.len());
                for sub in list {
                    let mut entry = serde_json::Map::with_capacity(2);
                    entry.insert("id".into(), serde_json::Value::String(sub.id.clone()));
                    entry.insert(
                        "content".into(),
                        to_json_safe(&Value::Binary(sub.content.clone()), name)?,
                    );
                    items.push(serde_json::Value::Object(entry));
                }
                serde_json::Value::Array(items)
            }
        };
        doc.insert(name.clone(), json_value);
    }
    serde_json::to_vec(&serde_json::Value::Object(doc))
        .map_err(|e| CollectionError::Malformed(format!("record serialization failed: {}", e)))
}

/// Rebuilds one record from JSON-safe bytes, in canonical key order.
pub fn decode_record(
    bytes: &[u8],
    key_order: &[String],
    subrecord_field: &str,
) -> CollectionResult<Record> {
    let doc: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| CollectionError::Malformed(format!("record frame is not JSON: {}", e)))?;
    let map = doc
        .as_object()
        .ok_or_else(|| CollectionError::Malformed("record frame is not a JSON object".into()))?;

    let mut record = Record::new();
    for name in key_order {
        let json_value = map.get(name).ok_or_else(|| {
            CollectionError::Malformed(format!("record frame is missing field '{}'", name))
        })?;
        if name == subrecord_field {
            record.push_subrecords(name, decode_subrecords(json_value, name)?);
        } else {
            record.push_value(name, from_json_safe(json_value)?);
        }
    }
    Ok(record)
}

fn decode_subrecords(
    json_value: &serde_json::Value,
    field: &str,
) -> CollectionResult<Vec<BinarySubrecord>> {
    let items = json_value.as_array().ok_or_else(|| {
        CollectionError::Malformed(format!("field '{}' is not a sub-record array", field))
    })?;
    let mut subrecords = Vec::with_capacity(items.len());
    for item in items {
        let id = item
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                CollectionError::Malformed(format!("sub-record in '{}' is missing 'id'", field))
            })?
            .to_string();
        let content = item.get("content").ok_or_else(|| {
            CollectionError::Malformed(format!("sub-record in '{}' is missing 'content'", field))
        })?;
        match from_json_safe(content)? {
            Value::Binary(bytes) => subrecords.push(BinarySubrecord::new(id, bytes)),
            other => {
                return Err(CollectionError::Malformed(format!(
                    "sub-record content in '{}' decoded as {}, expected binary",
                    field,
                    other.shape_name()
                )))
            }
        }
    }
    Ok(subrecords)
}
