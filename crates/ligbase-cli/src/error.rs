use ligbase::core::chem::toolkit::ChemError;
use ligbase::core::classify::family::TaxonomyLoadError;
use ligbase::engine::error::{EnhanceError, ImportError};
use ligbase::engine::tabular::TableError;
use ligbase::store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Enhance(#[from] EnhanceError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Chemistry(#[from] ChemError),

    #[error(transparent)]
    Taxonomy(#[from] TaxonomyLoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
