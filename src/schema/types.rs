//! Layout type definitions
//!
//! A layout maps each column of the destination table to a storage type.
//! It is derived once per run from the first record and never mutated.
//!
//! Storage types:
//! - integer-non-null: the synthesized sequence-position column
//! - text-array / binary-array: the split sub-record id/content columns
//! - boolean: boolean record fields
//! - json-container: nested mappings and sequences
//! - bounded-text: everything else

use serde::{Deserialize, Serialize};

/// Width of bounded-text columns, matching the original destination schema.
pub const BOUNDED_TEXT_WIDTH: usize = 400;

/// Storage type of one column, as a tagged variant rather than runtime
/// type dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Sequence position; unique, contiguous, never null
    IntegerNotNull,
    /// Sub-record identifiers, one per sub-record, order-preserving
    TextArray,
    /// Sub-record payloads, parallel to the identifier array
    BinaryArray,
    /// Boolean field
    Boolean,
    /// Nested mapping/sequence, stored as a JSON document
    JsonContainer,
    /// Scalar field, stored as bounded text
    BoundedText,
}

impl StorageType {
    /// SQL type spelling used in generated DDL
    pub fn sql_type(&self) -> String {
        match self {
            StorageType::IntegerNotNull => "INTEGER NOT NULL".into(),
            StorageType::TextArray => "TEXT[]".into(),
            StorageType::BinaryArray => "BYTEA[]".into(),
            StorageType::Boolean => "BOOLEAN".into(),
            StorageType::JsonContainer => "JSONB".into(),
            StorageType::BoundedText => format!("VARCHAR({})", BOUNDED_TEXT_WIDTH),
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            StorageType::IntegerNotNull => "integer-non-null",
            StorageType::TextArray => "text-array",
            StorageType::BinaryArray => "binary-array",
            StorageType::Boolean => "boolean",
            StorageType::JsonContainer => "json-container",
            StorageType::BoundedText => "bounded-text",
        }
    }
}

/// Scalar shape observed in the sample record for a bounded-text column.
///
/// Bounded-text storage holds text; the hint lets decode restore the
/// original scalar shape exactly (e.g. an integer field round-trips as an
/// integer, not as the text "42").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarShape {
    Text,
    Int,
    Float,
}

/// One column of the destination table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name (equals the record field name, except for the
    /// synthesized position column and the split sub-record columns)
    pub name: String,
    /// Storage type
    pub storage_type: StorageType,
    /// Whether the column carries NOT NULL (identity fields and position)
    pub not_null: bool,
    /// Scalar shape hint for bounded-text columns, from the sample record
    pub shape_hint: Option<ScalarShape>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
        Self {
            name: name.into(),
            storage_type,
            not_null: matches!(storage_type, StorageType::IntegerNotNull),
            shape_hint: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_shape_hint(mut self, hint: ScalarShape) -> Self {
        self.shape_hint = Some(hint);
        self
    }
}

/// Complete inferred layout for one run.
///
/// Invariant: the record-field columns of the layout equal the key set of
/// every record in the collection. The first record establishes this; a
/// later divergence is a fatal layout violation at mapping time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// All columns in destination order: position first, record fields in
    /// canonical order, then the sub-record id/content arrays
    pub columns: Vec<ColumnDef>,
    /// Identity fields forming the uniqueness constraint, in order
    pub identity_fields: Vec<String>,
    /// Name of the synthesized position column
    pub position_column: String,
    /// Name of the record field holding the sub-record list
    pub subrecord_field: String,
    /// Name of the sub-record identifier array column
    pub id_array_column: String,
    /// Name of the sub-record content array column
    pub content_array_column: String,
}

impl Layout {
    /// Column lookup by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns that correspond to plain record fields: everything except
    /// the position column and the split sub-record arrays.
    pub fn field_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| {
            c.name != self.position_column
                && c.name != self.id_array_column
                && c.name != self.content_array_column
        })
    }

    /// The field names every record must carry: the plain-field columns
    /// plus the designated sub-record field.
    pub fn expected_fields(&self) -> Vec<String> {
        let mut names: Vec<String> = self.field_columns().map(|c| c.name.clone()).collect();
        names.push(self.subrecord_field.clone());
        names
    }

    /// Renders the idempotent table-creation statement.
    ///
    /// The uniqueness constraint on the identity fields doubles as the
    /// primary key, which the skip-on-conflict insert policy relies on.
    pub fn create_table_sql(&self, table: &str) -> String {
        let mut col_defs: Vec<String> = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            let mut def = format!("{} {}", col.name, col.storage_type.sql_type());
            if col.not_null && !matches!(col.storage_type, StorageType::IntegerNotNull) {
                def.push_str(" NOT NULL");
            }
            col_defs.push(def);
        }
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{},\nPRIMARY KEY ({})\n);",
            table,
            col_defs.join(",\n"),
            self.identity_fields.join(", ")
        )
    }
}
