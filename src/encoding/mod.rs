//! Safe encoding subsystem for proteoflow
//!
//! Converts arbitrary nested record values into forms the storage layer
//! accepts natively, and back, without loss. Raw bytes embedded in
//! structured values are base64-tagged before JSON containment; top-level
//! byte payloads bound for binary-array columns pass through untouched.
//!
//! # Invariants Enforced
//!
//! - decode(encode(v)) == v for every reachable value
//! - Binary never enters a JSON document as a plain value
//! - Malformed markers fail loudly, never coerce

mod errors;
mod safe;

pub use errors::{EncodingError, EncodingResult};
pub use safe::{
    decode, encode, from_json_safe, to_json_safe, StorageValue, MARKER_DATA_KEY,
    MARKER_ENCODING_BASE64, MARKER_ENCODING_KEY, MARKER_TYPE_BYTES, MARKER_TYPE_KEY,
};
