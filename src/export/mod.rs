//! Subset export for proteoflow
//!
//! Pulls a filtered slice of a stored collection back out as records,
//! matched by equality on the identity fields (the full key or a prefix
//! of it). Results keep the position order of the source table. An
//! empty match is a reported outcome, never an error.

use std::path::Path;

use crate::collection::{write_collection, CollectionResult};
use crate::mapper::RecordMapper;
use crate::observability::{Logger, Severity};
use crate::record::Record;
use crate::schema::Layout;
use crate::store::RelationalStore;
use crate::transfer::TransferResult;

/// Filter over the layout's identity fields, in declaration order.
///
/// A predicate may bind the full key or any leading prefix of it:
/// binding only the first identity field selects every record sharing
/// that value.
#[derive(Debug, Clone, Default)]
pub struct IdentityFilter {
    bindings: Vec<(String, String)>,
}

impl IdentityFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.push((field.into(), value.into()));
        self
    }

    pub fn bindings(&self) -> &[(String, String)] {
        &self.bindings
    }
}

/// Selects the records matching the filter, ordered by position.
pub fn export_by_identity<S: RelationalStore>(
    store: &S,
    table: &str,
    layout: &Layout,
    canonical_key_order: &[String],
    filter: &IdentityFilter,
) -> TransferResult<Vec<Record>> {
    let mapper = RecordMapper::new(layout);
    let rows = store.select_by_identity(table, layout, filter.bindings())?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        records.push(mapper.from_row(row, canonical_key_order)?);
    }

    Logger::log(
        Severity::Info,
        "export_complete",
        &[
            ("matched", &records.len().to_string()),
            ("table", &table.to_string()),
        ],
    );
    if records.is_empty() {
        Logger::log(
            Severity::Warn,
            "export_empty_match",
            &[("table", &table.to_string())],
        );
    }
    Ok(records)
}

/// Writes an exported subset to a collection file.
pub fn export_to_file(
    path: &Path,
    records: &[Record],
    subrecord_field: &str,
) -> CollectionResult<usize> {
    write_collection(path, records, subrecord_field)
}
