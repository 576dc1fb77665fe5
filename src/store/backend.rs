//! Relational store interface
//!
//! The relational engine itself is an external collaborator. This trait
//! is the narrow surface the pipeline needs from it: idempotent table
//! creation, parameterized inserts with a skip-on-conflict policy, and
//! ordered selects. Each run holds one backend as a scoped resource,
//! released on every exit path.

use crate::mapper::Row;
use crate::schema::Layout;

use super::errors::StoreResult;

/// Outcome of a single insert under the skip-on-conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was written
    Inserted,
    /// A row with the same identity key already existed; nothing changed
    SkippedConflict,
}

/// The storage operations the transfer engine is built against.
///
/// Implementations must honor two guarantees the pipeline depends on:
/// the identity-key uniqueness constraint (duplicate inserts are skipped,
/// never overwritten), and retrieval ordered exclusively by the layout's
/// position column, never by storage-internal row order.
pub trait RelationalStore {
    /// Applies the layout as a table, a no-op if a matching table exists.
    fn create_table_if_absent(&mut self, table: &str, layout: &Layout) -> StoreResult<()>;

    /// Inserts one row; a duplicate identity key is silently skipped.
    fn insert_row(&mut self, table: &str, layout: &Layout, row: &Row)
        -> StoreResult<InsertOutcome>;

    /// Returns all rows ordered ascending by the position column.
    fn select_all_ordered(&self, table: &str, layout: &Layout) -> StoreResult<Vec<Row>>;

    /// Returns rows matching equality on the given identity-field values
    /// (the full key or a prefix of it), ordered ascending by position.
    fn select_by_identity(
        &self,
        table: &str,
        layout: &Layout,
        predicate: &[(String, String)],
    ) -> StoreResult<Vec<Row>>;
}
