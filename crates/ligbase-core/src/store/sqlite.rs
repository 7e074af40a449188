use super::schema::init_schema;
use super::{RowId, StoreError, StoreStats, StructureStore};
use crate::core::chem::properties::LigandProperties;
use crate::core::records::{CategoryRecord, LigandRecord, StructureRecord};
use crate::core::utils::identifiers::normalize_pdb_id;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

/// SQLite-backed [`StructureStore`].
pub struct SqliteStore {
    conn: Connection,
}

const STRUCTURE_COLUMNS: &str = "p.pdb_id, p.title, p.description, p.resolution, p.temperature, \
     p.experiment_method, p.quality, p.num_chains, p.chains_json, \
     p.experimental_conditions_json, p.status";

const LIGAND_COLUMNS: &str = "l.chain_id, l.residue_id, l.residue_name, l.num_atoms, \
     l.center_x, l.center_y, l.center_z, l.smiles, l.molecular_weight, l.logp, \
     l.h_donors, l.h_acceptors, l.rotatable_bonds, l.rings, l.tpsa, l.qed, \
     l.lipinski_violations, l.is_druglike, l.binding_site_json, l.binding_metrics_json";

fn to_json<T: Serialize>(column: &'static str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Json { column, source })
}

fn from_json<T: DeserializeOwned>(column: &'static str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Json { column, source })
}

/// Structure columns as read, before the JSON columns are decoded.
struct StructureRow {
    record: StructureRecord,
    chains_json: String,
    conditions_json: String,
}

impl StructureRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let status: String = row.get(10)?;
        Ok(Self {
            record: StructureRecord {
                pdb_id: row.get(0)?,
                title: row.get(1)?,
                description: row.get(2)?,
                resolution: row.get(3)?,
                temperature: row.get(4)?,
                experiment_method: row.get(5)?,
                quality: row.get(6)?,
                num_chains: row.get(7)?,
                status: status.parse().unwrap_or_default(),
                ..Default::default()
            },
            chains_json: row.get(8)?,
            conditions_json: row.get(9)?,
        })
    }

    fn decode(self) -> Result<StructureRecord, StoreError> {
        Ok(StructureRecord {
            chains: from_json("chains_json", &self.chains_json)?,
            experimental_conditions: from_json(
                "experimental_conditions_json",
                &self.conditions_json,
            )?,
            ..self.record
        })
    }
}

struct LigandRow {
    record: LigandRecord,
    properties: Option<LigandProperties>,
    binding_site_json: String,
    binding_metrics_json: String,
}

impl LigandRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let molecular_weight: Option<f64> = row.get(8)?;
        let properties = match molecular_weight {
            Some(molecular_weight) => Some(LigandProperties {
                molecular_weight,
                logp: row.get::<_, Option<f64>>(9)?.unwrap_or_default(),
                h_donors: row.get::<_, Option<u32>>(10)?.unwrap_or_default(),
                h_acceptors: row.get::<_, Option<u32>>(11)?.unwrap_or_default(),
                rotatable_bonds: row.get::<_, Option<u32>>(12)?.unwrap_or_default(),
                rings: row.get::<_, Option<u32>>(13)?.unwrap_or_default(),
                tpsa: row.get::<_, Option<f64>>(14)?.unwrap_or_default(),
                qed: row.get::<_, Option<f64>>(15)?.unwrap_or_default(),
                lipinski_violations: row.get::<_, Option<u32>>(16)?.unwrap_or_default(),
                is_druglike: row.get::<_, Option<bool>>(17)?.unwrap_or_default(),
            }),
            None => None,
        };
        Ok(Self {
            record: LigandRecord {
                chain_id: row.get(0)?,
                residue_id: row.get(1)?,
                residue_name: row.get(2)?,
                num_atoms: row.get(3)?,
                center: [row.get(4)?, row.get(5)?, row.get(6)?],
                smiles: row.get(7)?,
                ..Default::default()
            },
            properties,
            binding_site_json: row.get(18)?,
            binding_metrics_json: row.get(19)?,
        })
    }

    fn decode(self) -> Result<LigandRecord, StoreError> {
        Ok(LigandRecord {
            properties: self.properties,
            binding_site: from_json("binding_site_json", &self.binding_site_json)?,
            binding_metrics: from_json("binding_metrics_json", &self.binding_metrics_json)?,
            ..self.record
        })
    }
}

impl SqliteStore {
    /// Opens or creates a database file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!(path = %path.display(), "Opening SQLite database");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        debug!("Opening in-memory SQLite database");
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn structure(&self, pdb_id: &str) -> Result<Option<StructureRecord>, StoreError> {
        let sql = format!("SELECT {STRUCTURE_COLUMNS} FROM proteins p WHERE p.pdb_id = ?1");
        self.conn
            .query_row(&sql, [normalize_pdb_id(pdb_id)], StructureRow::from_row)
            .optional()?
            .map(StructureRow::decode)
            .transpose()
    }

    /// Ligands of a structure in insertion order.
    pub fn ligands(&self, pdb_id: &str) -> Result<Vec<LigandRecord>, StoreError> {
        let sql = format!(
            "SELECT {LIGAND_COLUMNS} FROM ligands l JOIN proteins p ON p.id = l.protein_id \
             WHERE p.pdb_id = ?1 ORDER BY l.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([normalize_pdb_id(pdb_id)], LigandRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(LigandRow::decode).collect()
    }

    /// Category names of a structure, sorted.
    pub fn categories(&self, pdb_id: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name FROM categories c \
             JOIN protein_categories pc ON pc.category_id = c.id \
             JOIN proteins p ON p.id = pc.protein_id \
             WHERE p.pdb_id = ?1 ORDER BY c.name",
        )?;
        let names = stmt
            .query_map([normalize_pdb_id(pdb_id)], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    pub fn category(&self, name: &str) -> Result<Option<CategoryRecord>, StoreError> {
        let category = self
            .conn
            .query_row(
                "SELECT id, name, description FROM categories WHERE name = ?1",
                [name],
                |row| {
                    Ok(CategoryRecord {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    /// Structures tagged with a category, ordered by `pdb_id`.
    pub fn structures_by_category(&self, name: &str) -> Result<Vec<StructureRecord>, StoreError> {
        let sql = format!(
            "SELECT {STRUCTURE_COLUMNS} FROM proteins p \
             JOIN protein_categories pc ON pc.protein_id = p.id \
             JOIN categories c ON c.id = pc.category_id \
             WHERE c.name = ?1 ORDER BY p.pdb_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([name], StructureRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(StructureRow::decode).collect()
    }

    pub fn stats(&self) -> Result<StoreStats, StoreError> {
        let count = |table: &str| -> Result<u64, StoreError> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(n as u64)
        };
        Ok(StoreStats {
            protein_count: count("proteins")?,
            ligand_count: count("ligands")?,
            category_count: count("categories")?,
        })
    }

    /// Overwrites the descriptor columns of one ligand, identified by
    /// structure and `(chain_id, residue_id, residue_name)`.
    ///
    /// Returns the number of rows changed; 0 when no such ligand exists.
    pub fn update_ligand_properties(
        &mut self,
        pdb_id: &str,
        chain_id: &str,
        residue_id: &str,
        residue_name: &str,
        smiles: Option<&str>,
        properties: &LigandProperties,
    ) -> Result<usize, StoreError> {
        let changed = self.conn.execute(
            "UPDATE ligands SET smiles = COALESCE(?5, smiles), molecular_weight = ?6, logp = ?7, \
             h_donors = ?8, h_acceptors = ?9, rotatable_bonds = ?10, rings = ?11, tpsa = ?12, \
             qed = ?13, lipinski_violations = ?14, is_druglike = ?15 \
             WHERE protein_id = (SELECT id FROM proteins WHERE pdb_id = ?1) \
             AND chain_id = ?2 AND residue_id = ?3 AND residue_name = ?4",
            params![
                normalize_pdb_id(pdb_id),
                chain_id,
                residue_id,
                residue_name,
                smiles,
                properties.molecular_weight,
                properties.logp,
                properties.h_donors,
                properties.h_acceptors,
                properties.rotatable_bonds,
                properties.rings,
                properties.tpsa,
                properties.qed,
                properties.lipinski_violations,
                properties.is_druglike,
            ],
        )?;
        Ok(changed)
    }

    fn link_categories(
        &mut self,
        structure_id: RowId,
        category_ids: &[RowId],
    ) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT OR IGNORE INTO protein_categories (protein_id, category_id) VALUES (?1, ?2)",
        )?;
        for category_id in category_ids {
            stmt.execute(params![structure_id, category_id])?;
        }
        Ok(())
    }
}

impl StructureStore for SqliteStore {
    fn begin(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("BEGIN")?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
    }

    fn find_structure(&self, pdb_id: &str) -> Result<Option<RowId>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM proteins WHERE pdb_id = ?1",
                [normalize_pdb_id(pdb_id)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    fn insert_structure(&mut self, record: &StructureRecord) -> Result<RowId, StoreError> {
        self.conn.execute(
            "INSERT INTO proteins (pdb_id, title, description, resolution, temperature, \
             experiment_method, quality, num_chains, chains_json, experimental_conditions_json, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                normalize_pdb_id(&record.pdb_id),
                record.title,
                record.description,
                record.resolution,
                record.temperature,
                record.experiment_method,
                record.quality,
                record.num_chains,
                to_json("chains_json", &record.chains)?,
                to_json("experimental_conditions_json", &record.experimental_conditions)?,
                record.status.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_structure(&mut self, id: RowId, record: &StructureRecord) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE proteins SET title = ?2, description = ?3, resolution = ?4, temperature = ?5, \
             experiment_method = ?6, quality = ?7, num_chains = ?8, chains_json = ?9, \
             experimental_conditions_json = ?10, status = ?11, updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?1",
            params![
                id,
                record.title,
                record.description,
                record.resolution,
                record.temperature,
                record.experiment_method,
                record.quality,
                record.num_chains,
                to_json("chains_json", &record.chains)?,
                to_json("experimental_conditions_json", &record.experimental_conditions)?,
                record.status.as_str(),
            ],
        )?;
        Ok(())
    }

    fn ensure_category(&mut self, name: &str) -> Result<RowId, StoreError> {
        let existing = self
            .conn
            .query_row("SELECT id FROM categories WHERE name = ?1", [name], |row| {
                row.get(0)
            })
            .optional()?;
        if let Some(id) = existing {
            return Ok(id);
        }
        self.conn.execute(
            "INSERT INTO categories (name, description) VALUES (?1, ?2)",
            params![name, CategoryRecord::description_for(name)],
        )?;
        debug!(category = name, "Created category");
        Ok(self.conn.last_insert_rowid())
    }

    fn add_structure_categories(
        &mut self,
        structure_id: RowId,
        category_ids: &[RowId],
    ) -> Result<(), StoreError> {
        self.link_categories(structure_id, category_ids)
    }

    fn replace_structure_categories(
        &mut self,
        structure_id: RowId,
        category_ids: &[RowId],
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM protein_categories WHERE protein_id = ?1",
            [structure_id],
        )?;
        self.link_categories(structure_id, category_ids)
    }

    fn delete_ligands(&mut self, structure_id: RowId) -> Result<usize, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM ligands WHERE protein_id = ?1", [structure_id])?;
        Ok(deleted)
    }

    fn insert_ligand(
        &mut self,
        structure_id: RowId,
        ligand: &LigandRecord,
    ) -> Result<RowId, StoreError> {
        let p = ligand.properties.as_ref();
        self.conn.execute(
            "INSERT INTO ligands (protein_id, chain_id, residue_id, residue_name, num_atoms, \
             center_x, center_y, center_z, smiles, molecular_weight, logp, h_donors, h_acceptors, \
             rotatable_bonds, rings, tpsa, qed, lipinski_violations, is_druglike, \
             binding_site_json, binding_metrics_json) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
            params![
                structure_id,
                ligand.chain_id,
                ligand.residue_id,
                ligand.residue_name,
                ligand.num_atoms,
                ligand.center[0],
                ligand.center[1],
                ligand.center[2],
                ligand.smiles,
                p.map(|p| p.molecular_weight),
                p.map(|p| p.logp),
                p.map(|p| p.h_donors),
                p.map(|p| p.h_acceptors),
                p.map(|p| p.rotatable_bonds),
                p.map(|p| p.rings),
                p.map(|p| p.tpsa),
                p.map(|p| p.qed),
                p.map(|p| p.lipinski_violations),
                p.map(|p| p.is_druglike),
                to_json("binding_site_json", &ligand.binding_site)?,
                to_json("binding_metrics_json", &ligand.binding_metrics)?,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}
