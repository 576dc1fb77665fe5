//! Collection frame format
//!
//! The container file is a sequence of checksummed frames:
//!
//! ```text
//! +------------------+
//! | Frame Length     | (u32 LE, total including this field)
//! +------------------+
//! | Frame Kind       | (u8: 0 = header, 1 = record)
//! +------------------+
//! | Payload          | (frame_length - 9 bytes)
//! +------------------+
//! | Checksum         | (u32 LE, CRC32 over length + kind + payload)
//! +------------------+
//! ```
//!
//! Every read validates the checksum; any failure aborts the read.

use crc32fast::Hasher;

use super::errors::{CollectionError, CollectionResult};

/// Smallest possible frame: length + kind + empty payload + checksum.
const MIN_FRAME_SIZE: usize = 4 + 1 + 4;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Frame kind discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Collection header: magic, version, canonical key order
    Header,
    /// One record as JSON-safe bytes
    Record,
}

impl FrameKind {
    fn to_byte(self) -> u8 {
        match self {
            FrameKind::Header => 0,
            FrameKind::Record => 1,
        }
    }

    fn from_byte(b: u8, offset: u64) -> CollectionResult<Self> {
        match b {
            0 => Ok(FrameKind::Header),
            1 => Ok(FrameKind::Record),
            other => Err(CollectionError::corruption(
                offset,
                format!("unknown frame kind {}", other),
            )),
        }
    }
}

/// One checksummed frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(kind: FrameKind, payload: Vec<u8>) -> Self {
        Self { kind, payload }
    }

    /// Serializes the frame to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let frame_length = (MIN_FRAME_SIZE + self.payload.len()) as u32;

        let mut checksum_data = Vec::with_capacity(5 + self.payload.len());
        checksum_data.extend_from_slice(&frame_length.to_le_bytes());
        checksum_data.push(self.kind.to_byte());
        checksum_data.extend_from_slice(&self.payload);
        let checksum = compute_checksum(&checksum_data);

        let mut frame = Vec::with_capacity(frame_length as usize);
        frame.extend_from_slice(&checksum_data);
        frame.extend_from_slice(&checksum.to_le_bytes());
        frame
    }

    /// Deserializes one frame from the start of `data`, verifying the
    /// checksum. `offset` is the frame's position in the file, used for
    /// error context. Returns the frame and the bytes consumed.
    pub fn deserialize(data: &[u8], offset: u64) -> CollectionResult<(Self, usize)> {
        if data.len() < MIN_FRAME_SIZE {
            return Err(CollectionError::corruption(
                offset,
                format!("truncated frame: {} bytes remain", data.len()),
            ));
        }

        let frame_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
        if frame_length < MIN_FRAME_SIZE {
            return Err(CollectionError::corruption(
                offset,
                format!("invalid frame length {}", frame_length),
            ));
        }
        if data.len() < frame_length {
            return Err(CollectionError::corruption(
                offset,
                format!(
                    "truncated frame: expected {} bytes, got {}",
                    frame_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = frame_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);
        if computed_checksum != stored_checksum {
            return Err(CollectionError::corruption(
                offset,
                format!(
                    "checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let kind = FrameKind::from_byte(data[4], offset)?;
        let payload = data[5..checksum_offset].to_vec();

        Ok((Self { kind, payload }, frame_length))
    }
}
