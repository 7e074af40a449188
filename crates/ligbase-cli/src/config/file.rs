use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FilePathsConfig {
    pub work_dir: Option<PathBuf>,
    pub database: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileEnhanceConfig {
    pub contact_cutoff: Option<f64>,
    pub taxonomy: Option<PathBuf>,
    pub structure_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileImportConfig {
    pub checkpoint_interval: Option<usize>,
}

/// Contents of a `--config` file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub paths: Option<FilePathsConfig>,
    pub enhance: Option<FileEnhanceConfig>,
    pub import: Option<FileImportConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` when given, otherwise an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map(Self::from_file).transpose().map(Option::unwrap_or_default)
    }
}
