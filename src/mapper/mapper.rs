//! Record <-> row mapping
//!
//! `to_row` turns one logical record into a storage row honoring the
//! inferred layout: the synthesized position first, every plain field in
//! canonical order through the safe encoder, and the sub-record list
//! split into two parallel same-length arrays (identifiers as text,
//! payloads as binary), preserving sub-record order index-for-index.
//!
//! `from_row` inverts the mapping by walking the canonical key order and
//! re-zipping the parallel arrays. Missing or null arrays read as empty.
//!
//! Invariant: a sub-record at list index i maps to identifier[i] and
//! content[i] in both directions.

use std::collections::BTreeSet;

use crate::encoding::{self, StorageValue};
use crate::record::{BinarySubrecord, Field, Record};
use crate::schema::{Layout, SchemaError};

use super::errors::{MapperError, MapperResult};
use super::row::Row;

/// Maps records to rows and back under one layout.
pub struct RecordMapper<'a> {
    layout: &'a Layout,
}

impl<'a> RecordMapper<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    /// Maps one record to a storage row at the given sequence position.
    ///
    /// # Errors
    ///
    /// - `PF_SCHEMA_LAYOUT_VIOLATION` if the record's field set diverges
    ///   from the layout (extra or missing fields are never coerced)
    /// - `SubrecordArityMismatch` if the split arrays diverge in length
    /// - an encoding error if a field value does not fit its column
    pub fn to_row(&self, record: &Record, position: usize) -> MapperResult<Row> {
        self.check_field_set(record)?;

        let mut row = Row::new();
        row.push(
            &self.layout.position_column,
            StorageValue::Integer(position as i64),
        );

        for (name, field) in record.fields() {
            if *name == self.layout.subrecord_field {
                continue;
            }
            let value = match field {
                Field::Value(v) => v,
                Field::Subrecords(_) => {
                    return Err(SchemaError::layout_violation(format!(
                        "Field '{}' holds sub-records but is not the designated sub-record field",
                        name
                    ))
                    .into())
                }
            };
            let column = self
                .layout
                .column(name)
                .ok_or_else(|| MapperError::MissingColumn(name.clone()))?;
            let stored =
                encoding::encode(value, column).map_err(|e| MapperError::encoding(name, e))?;
            row.push(name, stored);
        }

        let subrecords = record.subrecords(&self.layout.subrecord_field);
        let ids: Vec<String> = subrecords.iter().map(|s| s.id.clone()).collect();
        let contents: Vec<Vec<u8>> = subrecords.iter().map(|s| s.content.clone()).collect();
        if ids.len() != contents.len() {
            return Err(self.arity_mismatch(record, ids.len(), contents.len()));
        }
        row.push(&self.layout.id_array_column, StorageValue::TextArray(ids));
        row.push(
            &self.layout.content_array_column,
            StorageValue::BinaryArray(contents),
        );

        Ok(row)
    }

    /// Rebuilds the record from a storage row, in canonical key order.
    pub fn from_row(&self, row: &Row, canonical_key_order: &[String]) -> MapperResult<Record> {
        let mut record = Record::new();

        for name in canonical_key_order {
            if *name == self.layout.subrecord_field {
                record.push_subrecords(name, self.zip_subrecords(row)?);
                continue;
            }
            let column = self
                .layout
                .column(name)
                .ok_or_else(|| MapperError::MissingColumn(name.clone()))?;
            let stored = row
                .get(name)
                .ok_or_else(|| MapperError::MissingColumn(name.clone()))?;
            let value =
                encoding::decode(stored, column).map_err(|e| MapperError::encoding(name, e))?;
            record.push_value(name, value);
        }

        Ok(record)
    }

    /// Re-zips the parallel identifier/content arrays into the ordered
    /// sub-record list. Null or absent arrays are treated as empty.
    fn zip_subrecords(&self, row: &Row) -> MapperResult<Vec<BinarySubrecord>> {
        let ids: &[String] = match row.get(&self.layout.id_array_column) {
            Some(StorageValue::TextArray(ids)) => ids,
            Some(StorageValue::Null) | None => &[],
            Some(other) => {
                return Err(MapperError::MissingColumn(format!(
                    "{} (unexpected {} value)",
                    self.layout.id_array_column,
                    other.kind_name()
                )))
            }
        };
        let contents: &[Vec<u8>] = match row.get(&self.layout.content_array_column) {
            Some(StorageValue::BinaryArray(contents)) => contents,
            Some(StorageValue::Null) | None => &[],
            Some(other) => {
                return Err(MapperError::MissingColumn(format!(
                    "{} (unexpected {} value)",
                    self.layout.content_array_column,
                    other.kind_name()
                )))
            }
        };

        if ids.len() != contents.len() {
            let identity = row
                .identity_key(self.layout)
                .map(|k| k.join(":"))
                .unwrap_or_else(|_| "<unknown>".into());
            return Err(MapperError::SubrecordArityMismatch {
                identity,
                id_count: ids.len(),
                content_count: contents.len(),
            });
        }

        Ok(ids
            .iter()
            .zip(contents.iter())
            .map(|(id, content)| BinarySubrecord::new(id.clone(), content.clone()))
            .collect())
    }

    /// Verifies the record's field set matches the layout exactly.
    fn check_field_set(&self, record: &Record) -> MapperResult<()> {
        let expected: BTreeSet<String> = self.layout.expected_fields().into_iter().collect();
        let actual: BTreeSet<String> = record.key_order().into_iter().collect();

        if let Some(extra) = actual.difference(&expected).next() {
            return Err(SchemaError::layout_violation(format!(
                "Record carries field '{}' absent from the inferred layout",
                extra
            ))
            .into());
        }
        if let Some(missing) = expected.difference(&actual).next() {
            return Err(SchemaError::layout_violation(format!(
                "Record is missing field '{}' required by the inferred layout",
                missing
            ))
            .into());
        }
        Ok(())
    }

    fn arity_mismatch(&self, record: &Record, ids: usize, contents: usize) -> MapperError {
        let identity = record
            .identity_key(&self.layout.identity_fields)
            .map(|k| k.join(":"))
            .unwrap_or_else(|| "<unknown>".into());
        MapperError::SubrecordArityMismatch {
            identity,
            id_count: ids,
            content_count: contents,
        }
    }
}
