//! Collection reader
//!
//! Sequential reader for the framed container format. The header frame
//! must come first; every frame is checksum-verified and any corruption
//! aborts the read with the offending byte offset.

use std::fs;
use std::path::{Path, PathBuf};

use crate::record::Record;

use super::codec::{decode_record, CollectionHeader};
use super::errors::{CollectionError, CollectionResult};
use super::frame::{Frame, FrameKind};

/// Reads one collection file front to back.
#[derive(Debug)]
pub struct CollectionReader {
    path: PathBuf,
    data: Vec<u8>,
    offset: u64,
    header: CollectionHeader,
}

impl CollectionReader {
    /// Opens the file and reads the header frame.
    ///
    /// Fails if the file cannot be read, the first frame is not a valid
    /// header, or the header magic or version is wrong.
    pub fn open(path: &Path) -> CollectionResult<Self> {
        let data = fs::read(path).map_err(|e| {
            CollectionError::io(format!("failed to read {}", path.display()), e)
        })?;

        let (frame, consumed) = Frame::deserialize(&data, 0)?;
        if frame.kind != FrameKind::Header {
            return Err(CollectionError::Malformed(
                "first frame is not a header".into(),
            ));
        }
        let header: CollectionHeader = serde_json::from_slice(&frame.payload)
            .map_err(|e| CollectionError::Malformed(format!("header frame is not valid: {}", e)))?;
        header.validate()?;

        Ok(Self {
            path: path.to_path_buf(),
            data,
            offset: consumed as u64,
            header,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &CollectionHeader {
        &self.header
    }

    pub fn has_more(&self) -> bool {
        (self.offset as usize) < self.data.len()
    }

    /// Reads the next record frame, or `None` at end of file.
    pub fn read_next(&mut self) -> CollectionResult<Option<Record>> {
        if !self.has_more() {
            return Ok(None);
        }

        let (frame, consumed) = Frame::deserialize(&self.data[self.offset as usize..], self.offset)?;
        if frame.kind != FrameKind::Record {
            return Err(CollectionError::corruption(
                self.offset,
                "unexpected header frame after the file header",
            ));
        }
        self.offset += consumed as u64;

        let record = decode_record(
            &frame.payload,
            &self.header.key_order,
            &self.header.subrecord_field,
        )?;
        Ok(Some(record))
    }

    /// Reads every remaining record, in file order.
    pub fn read_all(&mut self) -> CollectionResult<Vec<Record>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }
}

/// Reads a whole collection in one call.
pub fn read_collection(path: &Path) -> CollectionResult<Vec<Record>> {
    CollectionReader::open(path)?.read_all()
}
