use super::StoreError;
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

pub const SCHEMA_VERSION: i32 = 1;

/// Creates the tables on a fresh database and records the schema version.
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    let current = schema_version(conn)?;
    if current == 0 {
        info!(version = SCHEMA_VERSION, "Creating database schema");
        conn.execute_batch(TABLES)?;
        conn.execute_batch(INDEXES)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current > SCHEMA_VERSION {
        return Err(StoreError::Internal(format!(
            "Database schema v{current} is newer than supported v{SCHEMA_VERSION}"
        )));
    }
    Ok(())
}

/// Current schema version, 0 for an uninitialized database.
pub fn schema_version(conn: &Connection) -> Result<i32, StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<(), StoreError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

const TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS proteins (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pdb_id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    resolution REAL,
    temperature REAL,
    experiment_method TEXT NOT NULL DEFAULT '',
    quality TEXT NOT NULL DEFAULT 'unknown_quality',
    num_chains INTEGER NOT NULL DEFAULT 0,
    chains_json TEXT NOT NULL DEFAULT '{}',
    experimental_conditions_json TEXT NOT NULL DEFAULT '{}',
    status TEXT NOT NULL DEFAULT 'pending',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS ligands (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    protein_id INTEGER NOT NULL REFERENCES proteins(id) ON DELETE CASCADE,
    chain_id TEXT NOT NULL,
    residue_id TEXT NOT NULL,
    residue_name TEXT NOT NULL,
    num_atoms INTEGER NOT NULL DEFAULT 0,
    center_x REAL NOT NULL DEFAULT 0,
    center_y REAL NOT NULL DEFAULT 0,
    center_z REAL NOT NULL DEFAULT 0,
    smiles TEXT,
    molecular_weight REAL,
    logp REAL,
    h_donors INTEGER,
    h_acceptors INTEGER,
    rotatable_bonds INTEGER,
    rings INTEGER,
    tpsa REAL,
    qed REAL,
    lipinski_violations INTEGER,
    is_druglike INTEGER,
    binding_site_json TEXT NOT NULL DEFAULT '{}',
    binding_metrics_json TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS protein_categories (
    protein_id INTEGER NOT NULL REFERENCES proteins(id) ON DELETE CASCADE,
    category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    PRIMARY KEY (protein_id, category_id)
);
"#;

const INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_ligands_protein ON ligands(protein_id);
CREATE INDEX IF NOT EXISTS idx_ligands_residue_name ON ligands(residue_name);
CREATE INDEX IF NOT EXISTS idx_protein_categories_category ON protein_categories(category_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent_and_records_version() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('proteins', 'ligands', 'categories', 'protein_categories')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn refuses_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        set_schema_version(&conn, SCHEMA_VERSION + 1).unwrap();
        assert!(matches!(init_schema(&conn), Err(StoreError::Internal(_))));
    }
}
