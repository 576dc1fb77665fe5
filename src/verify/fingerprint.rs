//! Order- and content-sensitive record fingerprints
//!
//! A fingerprint is a SHA-256 digest over a record's fields in canonical
//! order: field name, then value, with a domain tag and length prefix
//! per component so distinct records can never collide by concatenation.
//! The sub-record field contributes each identifier and payload in list
//! order.
//!
//! Fingerprints are computed on demand and never persisted. Two records
//! are content-identical iff their fingerprints match.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::record::{Field, Record, Value};

/// A fixed-length record digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Lowercase hex rendering of the digest.
    pub fn hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex())
    }
}

/// Computes the fingerprint of one record.
pub fn fingerprint(record: &Record) -> Fingerprint {
    let mut hasher = Sha256::new();
    for (name, field) in record.fields() {
        hash_str(&mut hasher, name);
        match field {
            Field::Value(value) => hash_value(&mut hasher, value),
            Field::Subrecords(list) => {
                hasher.update([0x10u8]);
                hasher.update((list.len() as u64).to_le_bytes());
                for sub in list {
                    hash_str(&mut hasher, &sub.id);
                    hash_bytes(&mut hasher, &sub.content);
                }
            }
        }
    }
    Fingerprint(hasher.finalize().into())
}

/// Computes the ordered fingerprint sequence for a collection.
pub fn fingerprint_sequence(records: &[Record]) -> Vec<Fingerprint> {
    records.iter().map(fingerprint).collect()
}

fn hash_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update([0x00u8]),
        Value::Bool(b) => {
            hasher.update([0x01u8]);
            hasher.update([*b as u8]);
        }
        Value::Int(n) => {
            hasher.update([0x02u8]);
            hasher.update(n.to_le_bytes());
        }
        Value::Float(x) => {
            hasher.update([0x03u8]);
            hasher.update(x.to_bits().to_le_bytes());
        }
        Value::Text(s) => {
            hasher.update([0x04u8]);
            hash_bytes(hasher, s.as_bytes());
        }
        Value::Binary(b) => {
            hasher.update([0x05u8]);
            hash_bytes(hasher, b);
        }
        Value::Array(items) => {
            hasher.update([0x06u8]);
            hasher.update((items.len() as u64).to_le_bytes());
            for item in items {
                hash_value(hasher, item);
            }
        }
        Value::Object(entries) => {
            hasher.update([0x07u8]);
            hasher.update((entries.len() as u64).to_le_bytes());
            for (key, item) in entries {
                hash_str(hasher, key);
                hash_value(hasher, item);
            }
        }
    }
}

fn hash_str(hasher: &mut Sha256, s: &str) {
    hash_bytes(hasher, s.as_bytes());
}

fn hash_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
