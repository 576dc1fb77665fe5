//! Encoding error types

use thiserror::Error;

/// Result type for encode/decode operations
pub type EncodingResult<T> = Result<T, EncodingError>;

/// Errors raised by the safe encoder.
///
/// `MalformedMarker` and `CorruptScalar` signal that a stored value is
/// unrecoverable; they are fatal for the value and must never be
/// silently coerced.
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    /// A tagged-binary marker object failed to decode
    #[error("Malformed binary marker: {0}")]
    MalformedMarker(String),

    /// A stored scalar no longer parses as its recorded shape
    #[error("Corrupt scalar in column '{column}': {reason}")]
    CorruptScalar { column: String, reason: String },

    /// A value's shape does not fit the column's storage type
    #[error("Value shape '{actual}' not representable in column '{column}' ({expected})")]
    ShapeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// JSON containers cannot hold NaN or infinite floats
    #[error("Non-finite float in column '{0}' cannot be stored")]
    NonFiniteFloat(String),
}
