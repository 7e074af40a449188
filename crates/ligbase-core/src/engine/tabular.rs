//! CSV artifacts exchanged between pipeline stages.
//!
//! Nested values (chains, ligands, metrics) are stored as JSON text inside a
//! cell. Readers must also cope with tables written by other tools, so cell
//! decoding goes through [`FieldParser`] rather than plain JSON.

use crate::core::parsing::{FieldParser, is_missing_cell};
use crate::core::records::{
    BaseRecord, ChainEntry, EnrichedRecord, LigandEntry, StructureStatus,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

pub const PROCESSED_COLUMNS: &[&str] = &[
    "pdb_id",
    "status",
    "num_models",
    "num_chains",
    "chains",
    "num_ligands",
    "ligands",
];

pub const ENHANCED_COLUMNS: &[&str] = &[
    "pdb_id",
    "status",
    "num_models",
    "num_chains",
    "chains",
    "num_ligands",
    "ligands",
    "title",
    "protein_families",
    "experimental_quality",
    "experimental_conditions",
    "binding_metrics",
    "related_structures",
    "enhanced_ligands",
];

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("CSV error in '{path}': {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Table '{path}' has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },
    #[error("Could not encode column '{column}': {source}")]
    Encode {
        column: &'static str,
        source: serde_json::Error,
    },
}

/// One table row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        self.0.insert(column.to_string(), value.into());
    }

    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Raw cell text, including empty cells.
    pub fn raw(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Cell text, or `None` if the column is absent or the cell holds no value.
    pub fn value(&self, column: &str) -> Option<&str> {
        self.raw(column)
            .map(str::trim)
            .filter(|v| !is_missing_cell(v))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn read(path: &Path) -> Result<Self, TableError> {
        let file = File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let csv_err = |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::Reader::from_reader(file);
        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            let row = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            rows.push(Row(row));
        }
        Ok(Self { headers, rows })
    }

    /// Writes the table, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<(), TableError> {
        let io_err = |source| TableError::Io {
            path: path.to_path_buf(),
            source,
        };
        let csv_err = |source| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let file = File::create(path).map_err(io_err)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(&self.headers).map_err(csv_err)?;
        for row in &self.rows {
            writer
                .write_record(self.headers.iter().map(|h| row.raw(h).unwrap_or("")))
                .map_err(csv_err)?;
        }
        writer.flush().map_err(io_err)
    }

    pub fn require_column(&self, column: &str, path: &Path) -> Result<(), TableError> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(TableError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
        }
    }
}

fn encode<T: Serialize>(column: &'static str, value: &T) -> Result<String, TableError> {
    serde_json::to_string(value).map_err(|source| TableError::Encode { column, source })
}

fn base_cells(record: &BaseRecord) -> Result<Row, TableError> {
    Ok(Row::new()
        .with("pdb_id", record.pdb_id.as_str())
        .with("status", record.status.as_str())
        .with("num_models", record.num_models.to_string())
        .with("num_chains", record.num_chains().to_string())
        .with("chains", encode("chains", &record.chains)?)
        .with("num_ligands", record.num_ligands().to_string())
        .with("ligands", encode("ligands", &record.ligands)?))
}

pub fn processed_table(records: &[BaseRecord]) -> Result<Table, TableError> {
    let mut table = Table::with_headers(PROCESSED_COLUMNS);
    for record in records {
        table.rows.push(base_cells(record)?);
    }
    Ok(table)
}

pub fn enhanced_table(records: &[EnrichedRecord]) -> Result<Table, TableError> {
    let mut table = Table::with_headers(ENHANCED_COLUMNS);
    for record in records {
        let mut row = base_cells(&record.base)?
            .with("title", record.title.as_str())
            .with("protein_families", encode("protein_families", &record.protein_families)?)
            .with("experimental_quality", record.experimental_quality.as_str())
            .with(
                "experimental_conditions",
                encode("experimental_conditions", &record.experimental_conditions)?,
            );
        if let Some(metrics) = &record.binding_metrics {
            row.set("binding_metrics", encode("binding_metrics", metrics)?);
        }
        if let Some(related) = &record.related_structures {
            row.set("related_structures", encode("related_structures", related)?);
        }
        if let Some(ligands) = &record.enhanced_ligands {
            row.set("enhanced_ligands", encode("enhanced_ligands", ligands)?);
        }
        table.rows.push(row);
    }
    Ok(table)
}

/// Decodes a nested cell into `T`, logging and returning `None` when the cell
/// is present but cannot be decoded.
pub fn decode_cell<T: DeserializeOwned>(
    row: &Row,
    column: &str,
    parser: &FieldParser,
) -> Option<T> {
    let raw = row.value(column)?;
    let pdb_id = row.value("pdb_id").unwrap_or("");
    let value: Value = match parser.parse(raw) {
        Ok(parsed) => parsed.value,
        Err(e) => {
            warn!(pdb_id, field = column, error = %e, "Unparseable cell");
            return None;
        }
    };
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(pdb_id, field = column, error = %e, "Cell has an unexpected shape");
            None
        }
    }
}

/// Decodes the `ligands` cell one entry at a time, so a malformed ligand is
/// dropped on its own. String-encoded centers are parsed like a cell.
pub fn decode_ligands(row: &Row, parser: &FieldParser) -> Vec<LigandEntry> {
    let pdb_id = row.value("pdb_id").unwrap_or("");
    decode_cell::<Vec<Value>>(row, "ligands", parser)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|mut entry| {
            if let Some(center) = entry.get_mut("center") {
                if let Some(raw) = center.as_str() {
                    let parsed = if is_missing_cell(raw) {
                        Value::Null
                    } else {
                        parser.parse(raw).map(|p| p.value).unwrap_or(Value::Null)
                    };
                    *center = parsed;
                }
            }
            match serde_json::from_value::<LigandEntry>(entry) {
                Ok(ligand) => Some(ligand),
                Err(e) => {
                    warn!(pdb_id, field = "ligands", error = %e, "Skipping malformed ligand entry");
                    None
                }
            }
        })
        .collect()
}

/// Rebuilds a base record from a row of the processed table.
pub fn base_record_from_row(row: &Row, parser: &FieldParser) -> BaseRecord {
    let pdb_id = row.value("pdb_id").unwrap_or_default().to_string();
    let status = row
        .value("status")
        .and_then(|s| s.parse::<StructureStatus>().ok())
        .unwrap_or_default();
    let num_models = row
        .value("num_models")
        .and_then(|s| s.parse::<f64>().ok())
        .map(|n| n as usize)
        .unwrap_or(0);

    BaseRecord {
        pdb_id,
        status,
        num_models,
        chains: decode_cell::<Vec<ChainEntry>>(row, "chains", parser).unwrap_or_default(),
        ligands: decode_ligands(row, parser),
    }
}
