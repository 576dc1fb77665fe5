//! Framed collection container for proteoflow
//!
//! The on-disk form of a protein collection: a header frame carrying the
//! canonical key order followed by one checksummed frame per record, in
//! collection order.
//!
//! # Design Principles
//!
//! - Append-only writes, fsync on finish
//! - Every frame is CRC32-verified on read; corruption aborts with the
//!   byte offset of the bad frame
//! - Record payloads are JSON-safe bytes, so embedded binary survives
//!   the trip losslessly

mod codec;
mod errors;
mod frame;
mod reader;
mod writer;

pub use codec::{decode_record, encode_record, CollectionHeader, FORMAT_MAGIC, FORMAT_VERSION};
pub use errors::{CollectionError, CollectionResult};
pub use frame::{compute_checksum, Frame, FrameKind};
pub use reader::{read_collection, CollectionReader};
pub use writer::{write_collection, CollectionWriter};
