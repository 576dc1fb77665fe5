//! Record and binary sub-record types
//!
//! A record is an ordered mapping from field name to value. Exactly one
//! designated field holds an ordered list of binary sub-records (PDB
//! structure files) instead of a plain value; everything else is a
//! scalar or structured `Value`.
//!
//! Records are immutable once read from input. Field order is captured
//! from the first record of a collection as the canonical key order and
//! reused verbatim for reconstruction.

use serde::{Deserialize, Serialize};

use super::value::Value;

/// One binary sub-record: an identifier and an opaque byte payload.
///
/// Owned exclusively by its parent record; never shared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySubrecord {
    /// Identifier string (e.g. a PDB id like "1ABC")
    pub id: String,
    /// Opaque byte payload
    pub content: Vec<u8>,
}

impl BinarySubrecord {
    pub fn new(id: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            content,
        }
    }
}

/// One field of a record: either a plain value or the designated
/// sub-record list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Field {
    /// A scalar or structured value
    Value(Value),
    /// The ordered binary sub-record list
    Subrecords(Vec<BinarySubrecord>),
}

/// One logical record: an ordered field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Field)>,
}

impl Record {
    /// Creates an empty record. Fields are appended in order.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a plain-value field, preserving insertion order.
    pub fn push_value(&mut self, name: impl Into<String>, value: Value) {
        self.fields.push((name.into(), Field::Value(value)));
    }

    /// Appends the sub-record list field, preserving insertion order.
    pub fn push_subrecords(&mut self, name: impl Into<String>, subrecords: Vec<BinarySubrecord>) {
        self.fields.push((name.into(), Field::Subrecords(subrecords)));
    }

    /// Field names in their original order.
    pub fn key_order(&self) -> Vec<String> {
        self.fields.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Ordered view of all fields.
    pub fn fields(&self) -> &[(String, Field)] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field lookup by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, f)| f)
    }

    /// Plain-value lookup by name. Returns `None` for the sub-record field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.field(name) {
            Some(Field::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// The ordered sub-record list under the given field name.
    ///
    /// A missing field or a plain-value field yields an empty slice; the
    /// mapper treats both the same way null arrays are treated on read.
    pub fn subrecords(&self, name: &str) -> &[BinarySubrecord] {
        match self.field(name) {
            Some(Field::Subrecords(list)) => list,
            _ => &[],
        }
    }

    /// The identity key: the text values of the given fields, in order.
    ///
    /// Returns `None` if any identity field is absent or not text.
    pub fn identity_key(&self, identity_fields: &[String]) -> Option<Vec<String>> {
        let mut key = Vec::with_capacity(identity_fields.len());
        for name in identity_fields {
            key.push(self.value(name)?.as_text()?.to_string());
        }
        Some(key)
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> Record {
        let mut r = Record::new();
        r.push_value("gene_id", Value::Text("ENSG01".into()));
        r.push_value("transcript_id", Value::Text("ENST01".into()));
        r.push_value("sequence", Value::Text("MKT".into()));
        r.push_subrecords(
            "pdb_files",
            vec![BinarySubrecord::new("1ABC", vec![0x00, 0x01])],
        );
        r
    }

    #[test]
    fn test_key_order_preserved() {
        let r = sample_record();
        assert_eq!(
            r.key_order(),
            vec!["gene_id", "transcript_id", "sequence", "pdb_files"]
        );
    }

    #[test]
    fn test_identity_key_extraction() {
        let r = sample_record();
        let key = r
            .identity_key(&["gene_id".into(), "transcript_id".into()])
            .unwrap();
        assert_eq!(key, vec!["ENSG01", "ENST01"]);
    }

    #[test]
    fn test_identity_key_missing_field() {
        let r = sample_record();
        assert!(r.identity_key(&["gene_id".into(), "absent".into()]).is_none());
    }

    #[test]
    fn test_subrecords_lookup() {
        let r = sample_record();
        assert_eq!(r.subrecords("pdb_files").len(), 1);
        assert_eq!(r.subrecords("pdb_files")[0].id, "1ABC");
        // Plain-value and missing fields read as empty
        assert!(r.subrecords("sequence").is_empty());
        assert!(r.subrecords("absent").is_empty());
    }
}
