//! In-memory reference backend
//!
//! A deliberately simple `RelationalStore` used by tests and as the
//! reference semantics for real backends: it enforces the identity
//! uniqueness constraint the same way ON CONFLICT DO NOTHING does,
//! rejects duplicate sequence positions, and sorts retrievals by the
//! position column rather than returning insertion order.

use std::collections::{HashMap, HashSet};

use crate::encoding::StorageValue;
use crate::mapper::Row;
use crate::schema::Layout;

use super::backend::{InsertOutcome, RelationalStore};
use super::errors::{StoreError, StoreResult};

#[derive(Debug)]
struct Table {
    layout: Layout,
    rows: Vec<Row>,
    identities: HashSet<Vec<String>>,
    positions: HashSet<i64>,
}

/// In-memory store keyed by table name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: HashMap<String, Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held by a table (0 if absent).
    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.rows.len()).unwrap_or(0)
    }

    fn table(&self, name: &str) -> StoreResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::NoSuchTable(name.to_string()))
    }

    fn identity_of(row: &Row, layout: &Layout) -> StoreResult<Vec<String>> {
        let mut key = Vec::with_capacity(layout.identity_fields.len());
        for field in &layout.identity_fields {
            match row.get(field) {
                Some(StorageValue::Text(s)) => key.push(s.clone()),
                _ => return Err(StoreError::MissingColumn(field.clone())),
            }
        }
        Ok(key)
    }

    fn position_of(row: &Row, layout: &Layout) -> StoreResult<i64> {
        match row.get(&layout.position_column) {
            Some(StorageValue::Integer(n)) => Ok(*n),
            _ => Err(StoreError::MissingColumn(layout.position_column.clone())),
        }
    }

    fn sorted_by_position(layout: &Layout, mut rows: Vec<Row>) -> StoreResult<Vec<Row>> {
        let mut keyed: Vec<(i64, Row)> = Vec::with_capacity(rows.len());
        for row in rows.drain(..) {
            keyed.push((Self::position_of(&row, layout)?, row));
        }
        keyed.sort_by_key(|(pos, _)| *pos);
        Ok(keyed.into_iter().map(|(_, row)| row).collect())
    }
}

impl RelationalStore for MemoryStore {
    fn create_table_if_absent(&mut self, table: &str, layout: &Layout) -> StoreResult<()> {
        if let Some(existing) = self.tables.get(table) {
            if existing.layout.columns != layout.columns {
                return Err(StoreError::SchemaMismatch {
                    table: table.to_string(),
                    detail: "column definitions differ from the requested layout".into(),
                });
            }
            return Ok(());
        }
        self.tables.insert(
            table.to_string(),
            Table {
                layout: layout.clone(),
                rows: Vec::new(),
                identities: HashSet::new(),
                positions: HashSet::new(),
            },
        );
        Ok(())
    }

    fn insert_row(
        &mut self,
        table: &str,
        layout: &Layout,
        row: &Row,
    ) -> StoreResult<InsertOutcome> {
        let identity = Self::identity_of(row, layout)?;
        let position = Self::position_of(row, layout)?;

        let state = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::NoSuchTable(table.to_string()))?;

        // ON CONFLICT (identity key) DO NOTHING
        if state.identities.contains(&identity) {
            return Ok(InsertOutcome::SkippedConflict);
        }
        if state.positions.contains(&position) {
            return Err(StoreError::DuplicatePosition {
                table: table.to_string(),
                position,
            });
        }

        state.identities.insert(identity);
        state.positions.insert(position);
        state.rows.push(row.clone());
        Ok(InsertOutcome::Inserted)
    }

    fn select_all_ordered(&self, table: &str, layout: &Layout) -> StoreResult<Vec<Row>> {
        let state = self.table(table)?;
        Self::sorted_by_position(layout, state.rows.clone())
    }

    fn select_by_identity(
        &self,
        table: &str,
        layout: &Layout,
        predicate: &[(String, String)],
    ) -> StoreResult<Vec<Row>> {
        let state = self.table(table)?;
        let matching: Vec<Row> = state
            .rows
            .iter()
            .filter(|row| {
                predicate.iter().all(|(field, wanted)| {
                    matches!(row.get(field), Some(StorageValue::Text(s)) if s == wanted)
                })
            })
            .cloned()
            .collect();
        Self::sorted_by_position(layout, matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnDef, ScalarShape, StorageType};

    fn test_layout() -> Layout {
        Layout {
            columns: vec![
                ColumnDef::new("protein_index", StorageType::IntegerNotNull),
                ColumnDef::new("gene_id", StorageType::BoundedText)
                    .not_null()
                    .with_shape_hint(ScalarShape::Text),
                ColumnDef::new("transcript_id", StorageType::BoundedText)
                    .not_null()
                    .with_shape_hint(ScalarShape::Text),
                ColumnDef::new("pdb_ids", StorageType::TextArray),
                ColumnDef::new("pdb_files", StorageType::BinaryArray),
            ],
            identity_fields: vec!["gene_id".into(), "transcript_id".into()],
            position_column: "protein_index".into(),
            subrecord_field: "pdb_files".into(),
            id_array_column: "pdb_ids".into(),
            content_array_column: "pdb_files".into(),
        }
    }

    fn test_row(gene: &str, transcript: &str, position: i64) -> Row {
        let mut row = Row::new();
        row.push("protein_index", StorageValue::Integer(position));
        row.push("gene_id", StorageValue::Text(gene.into()));
        row.push("transcript_id", StorageValue::Text(transcript.into()));
        row.push("pdb_ids", StorageValue::TextArray(vec![]));
        row.push("pdb_files", StorageValue::BinaryArray(vec![]));
        row
    }

    #[test]
    fn test_create_table_idempotent() {
        let layout = test_layout();
        let mut store = MemoryStore::new();
        store.create_table_if_absent("t", &layout).unwrap();
        store.create_table_if_absent("t", &layout).unwrap();
        assert_eq!(store.row_count("t"), 0);
    }

    #[test]
    fn test_create_table_rejects_divergent_layout() {
        let layout = test_layout();
        let mut store = MemoryStore::new();
        store.create_table_if_absent("t", &layout).unwrap();

        let mut other = layout.clone();
        other.columns.push(ColumnDef::new("extra", StorageType::Boolean));
        let err = store.create_table_if_absent("t", &other).unwrap_err();
        assert!(matches!(err, StoreError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_duplicate_identity_skipped_not_overwritten() {
        let layout = test_layout();
        let mut store = MemoryStore::new();
        store.create_table_if_absent("t", &layout).unwrap();

        let first = store
            .insert_row("t", &layout, &test_row("G1", "T1", 0))
            .unwrap();
        let second = store
            .insert_row("t", &layout, &test_row("G1", "T1", 5))
            .unwrap();

        assert_eq!(first, InsertOutcome::Inserted);
        assert_eq!(second, InsertOutcome::SkippedConflict);
        assert_eq!(store.row_count("t"), 1);

        // The original row survives untouched
        let rows = store.select_all_ordered("t", &layout).unwrap();
        assert_eq!(rows[0].get("protein_index"), Some(&StorageValue::Integer(0)));
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let layout = test_layout();
        let mut store = MemoryStore::new();
        store.create_table_if_absent("t", &layout).unwrap();

        store
            .insert_row("t", &layout, &test_row("G1", "T1", 0))
            .unwrap();
        let err = store
            .insert_row("t", &layout, &test_row("G1", "T2", 0))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicatePosition { position: 0, .. }));
    }

    #[test]
    fn test_select_orders_by_position_not_insertion() {
        let layout = test_layout();
        let mut store = MemoryStore::new();
        store.create_table_if_absent("t", &layout).unwrap();

        // Insert out of position order
        store
            .insert_row("t", &layout, &test_row("G1", "T2", 1))
            .unwrap();
        store
            .insert_row("t", &layout, &test_row("G1", "T1", 0))
            .unwrap();

        let rows = store.select_all_ordered("t", &layout).unwrap();
        assert_eq!(rows[0].get("transcript_id"), Some(&StorageValue::Text("T1".into())));
        assert_eq!(rows[1].get("transcript_id"), Some(&StorageValue::Text("T2".into())));
    }

    #[test]
    fn test_select_by_identity_prefix() {
        let layout = test_layout();
        let mut store = MemoryStore::new();
        store.create_table_if_absent("t", &layout).unwrap();

        store
            .insert_row("t", &layout, &test_row("G1", "T1", 0))
            .unwrap();
        store
            .insert_row("t", &layout, &test_row("G1", "T2", 1))
            .unwrap();
        store
            .insert_row("t", &layout, &test_row("G2", "T9", 2))
            .unwrap();

        let by_gene = store
            .select_by_identity("t", &layout, &[("gene_id".into(), "G1".into())])
            .unwrap();
        assert_eq!(by_gene.len(), 2);

        let by_full_key = store
            .select_by_identity(
                "t",
                &layout,
                &[
                    ("gene_id".into(), "G1".into()),
                    ("transcript_id".into(), "T2".into()),
                ],
            )
            .unwrap();
        assert_eq!(by_full_key.len(), 1);

        let no_match = store
            .select_by_identity("t", &layout, &[("gene_id".into(), "G9".into())])
            .unwrap();
        assert!(no_match.is_empty());
    }

    #[test]
    fn test_unknown_table_errors() {
        let layout = test_layout();
        let store = MemoryStore::new();
        let err = store.select_all_ordered("absent", &layout).unwrap_err();
        assert!(matches!(err, StoreError::NoSuchTable(_)));
    }
}
