//! Bulk transfer engine for proteoflow
//!
//! Drives persistence of N records against the store (one insert per
//! record, in input order, continuing past duplicate-key conflicts) and
//! retrieval of all rows ordered by sequence position.
//!
//! The skip-on-conflict insert policy is a deliberate idempotent-rerun
//! guarantee: re-running the pipeline against a non-empty destination
//! never duplicates or corrupts existing rows.

mod errors;

pub use errors::{TransferError, TransferResult};

use crate::mapper::RecordMapper;
use crate::observability::{Logger, Severity};
use crate::record::Record;
use crate::schema::Layout;
use crate::store::{InsertOutcome, RelationalStore};

/// Per-row insert driver and ordered retriever over one table.
pub struct BulkTransferEngine<'a, S: RelationalStore> {
    store: &'a mut S,
    table: String,
}

impl<'a, S: RelationalStore> BulkTransferEngine<'a, S> {
    pub fn new(store: &'a mut S, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Persists all records in input order.
    ///
    /// Returns the number of records attempted, not the number actually
    /// inserted: duplicate identity keys are skipped silently per the
    /// conflict policy. Callers needing the true insert count compute
    /// the row-count delta.
    ///
    /// # Errors
    ///
    /// Mapping failures and store failures abort the whole operation;
    /// there is no partial-result contract.
    pub fn persist_all(&mut self, records: &[Record], layout: &Layout) -> TransferResult<usize> {
        let mapper = RecordMapper::new(layout);
        let mut skipped = 0usize;
        let mut subrecord_total = 0usize;

        for (position, record) in records.iter().enumerate() {
            subrecord_total += record.subrecords(&layout.subrecord_field).len();
            let row = mapper.to_row(record, position)?;
            match self.store.insert_row(&self.table, layout, &row)? {
                InsertOutcome::Inserted => {}
                InsertOutcome::SkippedConflict => {
                    skipped += 1;
                    let identity = record
                        .identity_key(&layout.identity_fields)
                        .map(|k| k.join(":"))
                        .unwrap_or_else(|| "<unknown>".into());
                    Logger::log(
                        Severity::Warn,
                        "insert_conflict_skipped",
                        &[("identity", &identity), ("table", &self.table)],
                    );
                }
            }
        }

        Logger::log(
            Severity::Info,
            "persist_complete",
            &[
                ("attempted", &records.len().to_string()),
                ("skipped", &skipped.to_string()),
                ("subrecords", &subrecord_total.to_string()),
                ("table", &self.table),
            ],
        );
        Ok(records.len())
    }

    /// Retrieves every record, ordered ascending by sequence position,
    /// reconstructed in the given canonical key order.
    pub fn retrieve_all(
        &self,
        layout: &Layout,
        canonical_key_order: &[String],
    ) -> TransferResult<Vec<Record>> {
        let mapper = RecordMapper::new(layout);
        let rows = self.store.select_all_ordered(&self.table, layout)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(mapper.from_row(row, canonical_key_order)?);
        }

        Logger::log(
            Severity::Info,
            "retrieve_complete",
            &[
                ("records", &records.len().to_string()),
                ("table", &self.table),
            ],
        );
        Ok(records)
    }
}
