//! Data-driven layout inference
//!
//! The inferencer derives the complete column layout from a single
//! representative record (the first record of the input collection).
//! It is a pure function: applying the resulting layout to the store is
//! the storage collaborator's job, done idempotently.
//!
//! Classification rules per field value shape:
//! - bool -> boolean column
//! - nested mapping/sequence -> JSON-container column
//! - anything else -> bounded-text column (with a scalar shape hint)
//!
//! Two entries are fixed regardless of the sample: the synthesized
//! position column (integer, not null) and the split sub-record columns
//! (text array + binary array), appended after all record-field columns.

use crate::record::{Field, Record, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnDef, Layout, ScalarShape, StorageType};

/// Inference policy: the designated field names a run operates with.
///
/// Defaults match the protein collection this pipeline was built for.
#[derive(Debug, Clone, PartialEq)]
pub struct InferencePolicy {
    /// Fields forming the natural unique key, in order
    pub identity_fields: Vec<String>,
    /// Record field holding the ordered binary sub-record list
    pub subrecord_field: String,
    /// Name of the synthesized sequence-position column
    pub position_column: String,
    /// Name of the sub-record identifier array column
    pub id_array_column: String,
    /// Name of the sub-record content array column
    pub content_array_column: String,
}

impl Default for InferencePolicy {
    fn default() -> Self {
        Self {
            identity_fields: vec!["gene_id".into(), "transcript_id".into()],
            subrecord_field: "pdb_files".into(),
            position_column: "protein_index".into(),
            id_array_column: "pdb_ids".into(),
            content_array_column: "pdb_files".into(),
        }
    }
}

/// Derives a `Layout` from a representative record.
pub struct TypeInferencer {
    policy: InferencePolicy,
}

impl TypeInferencer {
    pub fn new(policy: InferencePolicy) -> Self {
        Self { policy }
    }

    /// Infers the column layout from the sample record.
    ///
    /// # Errors
    ///
    /// - `PF_SCHEMA_EMPTY_SAMPLE` if the record has no fields
    /// - `PF_SCHEMA_MISSING_IDENTITY` if an identity field is absent
    /// - `PF_SCHEMA_IDENTITY_NOT_TEXT` if an identity field is not text
    pub fn infer(&self, sample: &Record) -> SchemaResult<Layout> {
        if sample.is_empty() {
            return Err(SchemaError::empty_sample());
        }

        for name in &self.policy.identity_fields {
            match sample.value(name) {
                None => return Err(SchemaError::missing_identity(name)),
                Some(Value::Text(_)) => {}
                Some(other) => {
                    return Err(SchemaError::identity_not_text(name, other.shape_name()))
                }
            }
        }

        let mut columns = Vec::with_capacity(sample.len() + 2);
        columns.push(ColumnDef::new(
            &self.policy.position_column,
            StorageType::IntegerNotNull,
        ));

        for (name, field) in sample.fields() {
            if *name == self.policy.subrecord_field {
                continue;
            }
            let value = match field {
                Field::Value(v) => v,
                // A second sub-record list under a different name is
                // classified like any container
                Field::Subrecords(_) => &Value::Array(vec![]),
            };
            let mut col = Self::classify(name, value);
            if self.policy.identity_fields.contains(name) {
                col = col.not_null();
            }
            columns.push(col);
        }

        columns.push(ColumnDef::new(
            &self.policy.id_array_column,
            StorageType::TextArray,
        ));
        columns.push(ColumnDef::new(
            &self.policy.content_array_column,
            StorageType::BinaryArray,
        ));

        Ok(Layout {
            columns,
            identity_fields: self.policy.identity_fields.clone(),
            position_column: self.policy.position_column.clone(),
            subrecord_field: self.policy.subrecord_field.clone(),
            id_array_column: self.policy.id_array_column.clone(),
            content_array_column: self.policy.content_array_column.clone(),
        })
    }

    /// Classifies one field value into a column definition.
    fn classify(name: &str, value: &Value) -> ColumnDef {
        match value {
            Value::Bool(_) => ColumnDef::new(name, StorageType::Boolean),
            Value::Array(_) | Value::Object(_) => {
                ColumnDef::new(name, StorageType::JsonContainer)
            }
            Value::Int(_) => {
                ColumnDef::new(name, StorageType::BoundedText).with_shape_hint(ScalarShape::Int)
            }
            Value::Float(_) => {
                ColumnDef::new(name, StorageType::BoundedText).with_shape_hint(ScalarShape::Float)
            }
            // Null gives no shape evidence; text is the default the rest
            // of the collection is assumed to follow
            _ => ColumnDef::new(name, StorageType::BoundedText).with_shape_hint(ScalarShape::Text),
        }
    }
}
