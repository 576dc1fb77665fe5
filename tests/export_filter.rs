//! Subset export tests
//!
//! Exercises identity-filtered retrieval against a populated store and
//! the export-to-file path.

use proteoflow::collection::read_collection;
use proteoflow::export::{export_by_identity, export_to_file, IdentityFilter};
use proteoflow::pipeline::{run, PipelineConfig};
use proteoflow::record::{BinarySubrecord, Record, Value};
use proteoflow::store::MemoryStore;
use tempfile::TempDir;

fn make_record(gene: &str, transcript: &str) -> Record {
    let mut r = Record::new();
    r.push_value("gene_id", Value::Text(gene.into()));
    r.push_value("transcript_id", Value::Text(transcript.into()));
    r.push_value("sequence", Value::Text("MKT".into()));
    r.push_subrecords(
        "pdb_files",
        vec![BinarySubrecord::new("1ABC", vec![0xAB])],
    );
    r
}

fn populated() -> (Vec<Record>, proteoflow::schema::Layout, MemoryStore) {
    let records = vec![
        make_record("G1", "T1"),
        make_record("G2", "T1"),
        make_record("G1", "T2"),
        make_record("G3", "T1"),
    ];
    let mut store = MemoryStore::new();
    let report = run(&PipelineConfig::default(), &mut store, &records).unwrap();
    assert!(report.verified());
    (records, report.layout, store)
}

#[test]
fn test_export_by_full_identity_key() {
    let (records, layout, store) = populated();
    let key_order = records[0].key_order();

    let filter = IdentityFilter::new()
        .bind("gene_id", "G1")
        .bind("transcript_id", "T2");
    let exported =
        export_by_identity(&store, "protein_table", &layout, &key_order, &filter).unwrap();

    assert_eq!(exported, vec![records[2].clone()]);
}

#[test]
fn test_export_by_gene_prefix_keeps_collection_order() {
    let (records, layout, store) = populated();
    let key_order = records[0].key_order();

    let filter = IdentityFilter::new().bind("gene_id", "G1");
    let exported =
        export_by_identity(&store, "protein_table", &layout, &key_order, &filter).unwrap();

    // Both G1 transcripts, in the order they were persisted
    assert_eq!(exported, vec![records[0].clone(), records[2].clone()]);
}

#[test]
fn test_export_no_match_returns_empty() {
    let (records, layout, store) = populated();
    let key_order = records[0].key_order();

    let filter = IdentityFilter::new().bind("gene_id", "G404");
    let exported =
        export_by_identity(&store, "protein_table", &layout, &key_order, &filter).unwrap();
    assert!(exported.is_empty());
}

#[test]
fn test_exported_subset_file_roundtrip() {
    let (records, layout, store) = populated();
    let key_order = records[0].key_order();

    let filter = IdentityFilter::new().bind("gene_id", "G1");
    let exported =
        export_by_identity(&store, "protein_table", &layout, &key_order, &filter).unwrap();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("g1_subset.pfc");
    let written = export_to_file(&path, &exported, &layout.subrecord_field).unwrap();
    assert_eq!(written, 2);

    let read_back = read_collection(&path).unwrap();
    assert_eq!(read_back, exported);

    // The exported records are byte-identical to the originals
    let subs = read_back[0].subrecords("pdb_files");
    assert_eq!(subs[0].content, vec![0xAB]);
}
