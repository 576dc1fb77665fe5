//! Storage collaborator error types

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by a relational store backend.
///
/// Any failure here is fatal for the run: there is no partial-result
/// contract, and no retry is attempted (callers retry the whole run).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection or query failure in the backing engine
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Operation against a table that was never created
    #[error("Table '{0}' does not exist")]
    NoSuchTable(String),

    /// Table exists but its columns do not match the inferred layout
    #[error("Table '{table}' exists with a different layout: {detail}")]
    SchemaMismatch { table: String, detail: String },

    /// Two rows claimed the same sequence position
    #[error("Duplicate sequence position {position} in table '{table}'")]
    DuplicatePosition { table: String, position: i64 },

    /// A row arrived without a column the layout requires
    #[error("Row is missing column '{0}'")]
    MissingColumn(String),
}
