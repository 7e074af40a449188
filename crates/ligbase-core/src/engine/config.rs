use super::binding_site::DEFAULT_CONTACT_CUTOFF;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the base table written by the processing stage.
pub const PROCESSED_TABLE_NAME: &str = "processed_structures.csv";
/// File name of the table written by the enhancement stage.
pub const ENHANCED_TABLE_NAME: &str = "enhanced_structures.csv";
/// Rows committed per transaction segment during import.
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 10;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceConfig {
    pub base_table_path: PathBuf,
    pub structure_dir: PathBuf,
    pub output_path: PathBuf,
    pub contact_cutoff: f64,
}

#[derive(Default)]
pub struct EnhanceConfigBuilder {
    base_table_path: Option<PathBuf>,
    structure_dir: Option<PathBuf>,
    output_path: Option<PathBuf>,
    contact_cutoff: Option<f64>,
}

impl EnhanceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills every path from a single working directory laid out the way the
    /// processing stage leaves it: the base table and structure files side by
    /// side, output written next to them.
    pub fn work_dir(mut self, dir: &Path) -> Self {
        self.base_table_path = Some(dir.join(PROCESSED_TABLE_NAME));
        self.structure_dir = Some(dir.to_path_buf());
        self.output_path = Some(dir.join(ENHANCED_TABLE_NAME));
        self
    }

    pub fn base_table_path(mut self, path: PathBuf) -> Self {
        self.base_table_path = Some(path);
        self
    }
    pub fn structure_dir(mut self, path: PathBuf) -> Self {
        self.structure_dir = Some(path);
        self
    }
    pub fn output_path(mut self, path: PathBuf) -> Self {
        self.output_path = Some(path);
        self
    }
    pub fn contact_cutoff(mut self, cutoff: f64) -> Self {
        self.contact_cutoff = Some(cutoff);
        self
    }

    pub fn build(self) -> Result<EnhanceConfig, ConfigError> {
        let contact_cutoff = self.contact_cutoff.unwrap_or(DEFAULT_CONTACT_CUTOFF);
        if !(contact_cutoff.is_finite() && contact_cutoff > 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "contact_cutoff",
                reason: format!("must be a positive distance, got {contact_cutoff}"),
            });
        }
        Ok(EnhanceConfig {
            base_table_path: self
                .base_table_path
                .ok_or(ConfigError::MissingParameter("base_table_path"))?,
            structure_dir: self
                .structure_dir
                .ok_or(ConfigError::MissingParameter("structure_dir"))?,
            output_path: self
                .output_path
                .ok_or(ConfigError::MissingParameter("output_path"))?,
            contact_cutoff,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportConfig {
    pub checkpoint_interval: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
        }
    }
}

#[derive(Default)]
pub struct ImportConfigBuilder {
    checkpoint_interval: Option<usize>,
}

impl ImportConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn checkpoint_interval(mut self, rows: usize) -> Self {
        self.checkpoint_interval = Some(rows);
        self
    }

    pub fn build(self) -> Result<ImportConfig, ConfigError> {
        let checkpoint_interval = self
            .checkpoint_interval
            .unwrap_or(DEFAULT_CHECKPOINT_INTERVAL);
        if checkpoint_interval == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "checkpoint_interval",
                reason: "must be at least 1".into(),
            });
        }
        Ok(ImportConfig {
            checkpoint_interval,
        })
    }
}
