//! Collection container error types

use std::io;

use thiserror::Error;

use crate::encoding::EncodingError;

/// Result type for collection file operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Errors raised by the collection container.
///
/// Corruption is never ignored: a frame that fails its checksum aborts
/// the read with the byte offset of the bad frame.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Underlying file I/O failure
    #[error("Collection I/O failure ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A frame failed checksum or structural validation
    #[error("Collection corruption at byte offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// The file is structurally valid but semantically wrong
    /// (bad magic, unsupported version, missing header)
    #[error("Malformed collection: {0}")]
    Malformed(String),

    /// A record payload failed to encode or decode
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl CollectionError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn corruption(offset: u64, reason: impl Into<String>) -> Self {
        Self::Corruption {
            offset,
            reason: reason.into(),
        }
    }
}
