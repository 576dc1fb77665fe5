//! Storage row representation
//!
//! One row per record, columns ordered per the layout. Rows are created
//! at persist time and read back fresh at retrieval time; there is no
//! update-in-place.

use crate::encoding::StorageValue;
use crate::schema::Layout;

use super::errors::{MapperError, MapperResult};

/// One storage row: an ordered mapping from column name to storage value.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<(String, StorageValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    /// Appends a column value, preserving layout order.
    pub fn push(&mut self, name: impl Into<String>, value: StorageValue) {
        self.columns.push((name.into(), value));
    }

    /// Column lookup by name.
    pub fn get(&self, name: &str) -> Option<&StorageValue> {
        self.columns.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Ordered view of all columns.
    pub fn columns(&self) -> &[(String, StorageValue)] {
        &self.columns
    }

    /// The sequence position stored in this row.
    pub fn position(&self, layout: &Layout) -> MapperResult<i64> {
        match self.get(&layout.position_column) {
            Some(StorageValue::Integer(n)) => Ok(*n),
            _ => Err(MapperError::MissingColumn(layout.position_column.clone())),
        }
    }

    /// The identity-key values stored in this row, in identity-field order.
    pub fn identity_key(&self, layout: &Layout) -> MapperResult<Vec<String>> {
        let mut key = Vec::with_capacity(layout.identity_fields.len());
        for field in &layout.identity_fields {
            match self.get(field) {
                Some(StorageValue::Text(s)) => key.push(s.clone()),
                _ => return Err(MapperError::MissingColumn(field.clone())),
            }
        }
        Ok(key)
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}
