//! Record-mapping error types

use thiserror::Error;

use crate::encoding::EncodingError;
use crate::schema::SchemaError;

/// Result type for mapping operations
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors raised while mapping records to rows and back.
#[derive(Debug, Error)]
pub enum MapperError {
    /// The parallel sub-record arrays diverged in length.
    ///
    /// Fatal for the record: truncating either array would silently drop
    /// or misattribute a sub-record.
    #[error(
        "Sub-record arity mismatch for '{identity}': {id_count} identifiers vs {content_count} payloads"
    )]
    SubrecordArityMismatch {
        identity: String,
        id_count: usize,
        content_count: usize,
    },

    /// A record's field set diverges from the inferred layout
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A field value failed to encode or decode
    #[error("Field '{field}': {source}")]
    Encoding {
        field: String,
        #[source]
        source: EncodingError,
    },

    /// A row is missing a column the layout requires
    #[error("Row is missing column '{0}'")]
    MissingColumn(String),
}

impl MapperError {
    pub fn encoding(field: impl Into<String>, source: EncodingError) -> Self {
        Self::Encoding {
            field: field.into(),
            source,
        }
    }
}
