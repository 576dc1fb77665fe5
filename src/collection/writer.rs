//! Collection writer
//!
//! Append-only writer for the framed container format. The header frame
//! is written at creation; every record frame is appended in arrival
//! order. `finish` syncs the file so a completed export survives a
//! crash.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::record::Record;

use super::codec::{encode_record, CollectionHeader};
use super::errors::{CollectionError, CollectionResult};
use super::frame::{Frame, FrameKind};

/// Writes one collection file, header first, records in order.
pub struct CollectionWriter {
    path: PathBuf,
    file: File,
    header: CollectionHeader,
    records_written: usize,
}

impl CollectionWriter {
    /// Creates the collection file and writes the header frame.
    /// Truncates any existing file at the path.
    pub fn create(path: &Path, header: CollectionHeader) -> CollectionResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| {
                CollectionError::io(format!("failed to create {}", path.display()), e)
            })?;

        let mut writer = Self {
            path: path.to_path_buf(),
            file,
            header,
            records_written: 0,
        };

        let payload = serde_json::to_vec(&writer.header)
            .map_err(|e| CollectionError::Malformed(format!("header serialization failed: {}", e)))?;
        writer.write_frame(Frame::new(FrameKind::Header, payload))?;
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Appends one record frame.
    pub fn append_record(&mut self, record: &Record) -> CollectionResult<()> {
        let payload = encode_record(record)?;
        self.write_frame(Frame::new(FrameKind::Record, payload))?;
        self.records_written += 1;
        Ok(())
    }

    /// Syncs the file to disk and closes the writer.
    pub fn finish(self) -> CollectionResult<()> {
        self.file.sync_all().map_err(|e| {
            CollectionError::io(format!("fsync failed for {}", self.path.display()), e)
        })
    }

    fn write_frame(&mut self, frame: Frame) -> CollectionResult<()> {
        let serialized = frame.serialize();
        self.file.write_all(&serialized).map_err(|e| {
            CollectionError::io(format!("write failed for {}", self.path.display()), e)
        })
    }
}

/// Writes a whole collection in one call.
pub fn write_collection(
    path: &Path,
    records: &[Record],
    subrecord_field: &str,
) -> CollectionResult<usize> {
    let key_order = records.first().map(|r| r.key_order()).unwrap_or_default();
    let header = CollectionHeader::new(key_order, subrecord_field);
    let mut writer = CollectionWriter::create(path, header)?;
    for record in records {
        writer.append_record(record)?;
    }
    let written = writer.records_written();
    writer.finish()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BinarySubrecord, Value};
    use tempfile::TempDir;

    fn sample_record(gene: &str) -> Record {
        let mut r = Record::new();
        r.push_value("gene_id", Value::Text(gene.into()));
        r.push_value("transcript_id", Value::Text("T1".into()));
        r.push_subrecords(
            "pdb_files",
            vec![BinarySubrecord::new("1ABC", vec![0x00, 0x01])],
        );
        r
    }

    #[test]
    fn test_create_writes_header_frame() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("proteins.pfc");

        let header = CollectionHeader::new(vec!["gene_id".into()], "pdb_files");
        let writer = CollectionWriter::create(&path, header).unwrap();
        writer.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let (frame, _) = Frame::deserialize(&bytes, 0).unwrap();
        assert_eq!(frame.kind, FrameKind::Header);

        let header: CollectionHeader = serde_json::from_slice(&frame.payload).unwrap();
        assert!(header.validate().is_ok());
        assert_eq!(header.subrecord_field, "pdb_files");
    }

    #[test]
    fn test_append_counts_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("proteins.pfc");

        let record = sample_record("G1");
        let header = CollectionHeader::new(record.key_order(), "pdb_files");
        let mut writer = CollectionWriter::create(&path, header).unwrap();
        writer.append_record(&record).unwrap();
        writer.append_record(&sample_record("G2")).unwrap();
        assert_eq!(writer.records_written(), 2);
        writer.finish().unwrap();
    }

    #[test]
    fn test_write_collection_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.pfc");

        let written = write_collection(&path, &[], "pdb_files").unwrap();
        assert_eq!(written, 0);
        assert!(path.exists());
    }
}
