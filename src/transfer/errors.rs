//! Transfer engine error types

use thiserror::Error;

use crate::mapper::MapperError;
use crate::store::StoreError;

/// Result type for transfer operations
pub type TransferResult<T> = Result<T, TransferError>;

/// Errors raised while moving records through the store.
///
/// Either kind aborts the run; the caller retries the whole run, never
/// a partial one.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The backing store failed (connection, query, constraint)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A record failed to map to or from a row
    #[error(transparent)]
    Mapper(#[from] MapperError),
}
