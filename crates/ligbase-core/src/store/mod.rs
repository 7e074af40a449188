//! Relational persistence for reconciled structures.
//!
//! The import engine only talks to the [`StructureStore`] trait, so any
//! transactional backend can sit behind it. [`sqlite::SqliteStore`] is the
//! bundled implementation.
//!
//! ## Tables
//!
//! - `proteins` - One row per structure, unique on `pdb_id`
//! - `ligands` - Ligands owned by a protein, replaced wholesale on re-import
//! - `categories` - Protein family tags, created on first use
//! - `protein_categories` - Many-to-many link between the two

pub mod schema;
pub mod sqlite;

use crate::core::records::{LigandRecord, StructureRecord};
use serde::Serialize;
use thiserror::Error;

pub use sqlite::SqliteStore;

/// Surrogate key of a stored row.
pub type RowId = i64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Could not (de)serialize column '{column}': {source}")]
    Json {
        column: &'static str,
        source: serde_json::Error,
    },
    #[error("Store error: {0}")]
    Internal(String),
}

/// Row counts reported by [`SqliteStore::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub protein_count: u64,
    pub ligand_count: u64,
    pub category_count: u64,
}

/// Transactional write interface used by the import engine.
///
/// Writes between [`begin`](Self::begin) and [`commit`](Self::commit) form
/// one segment; [`rollback`](Self::rollback) discards the open segment and is
/// a no-op when none is open.
pub trait StructureStore {
    fn begin(&mut self) -> Result<(), StoreError>;
    fn commit(&mut self) -> Result<(), StoreError>;
    fn rollback(&mut self) -> Result<(), StoreError>;

    /// Looks a structure up by its normalized `pdb_id`.
    fn find_structure(&self, pdb_id: &str) -> Result<Option<RowId>, StoreError>;
    fn insert_structure(&mut self, record: &StructureRecord) -> Result<RowId, StoreError>;
    /// Overwrites every scalar attribute of an existing structure.
    fn update_structure(&mut self, id: RowId, record: &StructureRecord) -> Result<(), StoreError>;

    /// Returns the id of the named category, creating it if needed.
    fn ensure_category(&mut self, name: &str) -> Result<RowId, StoreError>;
    /// Links categories to a structure, keeping existing links.
    fn add_structure_categories(
        &mut self,
        structure_id: RowId,
        category_ids: &[RowId],
    ) -> Result<(), StoreError>;
    /// Makes `category_ids` the complete category set of a structure.
    fn replace_structure_categories(
        &mut self,
        structure_id: RowId,
        category_ids: &[RowId],
    ) -> Result<(), StoreError>;

    /// Deletes every ligand of a structure, returning how many were removed.
    fn delete_ligands(&mut self, structure_id: RowId) -> Result<usize, StoreError>;
    fn insert_ligand(
        &mut self,
        structure_id: RowId,
        ligand: &LigandRecord,
    ) -> Result<RowId, StoreError>;
}
