use super::config::ConfigError;
use super::tabular::TableError;
use crate::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("Structure {pdb_id} not found in processed data")]
    BaseRecordNotFound { pdb_id: String },

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not read metadata file '{path}': {source}")]
    MetadataIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid metadata in '{path}': {source}")]
    MetadataFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Could not read import source: {0}")]
    Source(#[from] TableError),

    #[error("Import aborted at row {row} ({pdb_id}); the open checkpoint segment was rolled back: {source}")]
    Fatal {
        row: usize,
        pdb_id: String,
        source: StoreError,
    },
}
