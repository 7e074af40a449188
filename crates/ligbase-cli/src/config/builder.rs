use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::{EnhanceArgs, ImportArgs};
use crate::error::{CliError, Result};
use ligbase::engine::config::{
    ENHANCED_TABLE_NAME, EnhanceConfig, EnhanceConfigBuilder, ImportConfig, ImportConfigBuilder,
    PROCESSED_TABLE_NAME,
};
use std::path::{Path, PathBuf};

/// Everything the `enhance` command needs besides the metadata itself.
pub struct EnhanceSettings {
    pub core: EnhanceConfig,
    pub taxonomy: Option<PathBuf>,
}

/// Resolved settings of the `import` command.
pub struct ImportSettings {
    pub input: PathBuf,
    pub database: PathBuf,
    pub core: ImportConfig,
}

pub fn work_dir(file: &FileConfig, cli: Option<&Path>) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| file.paths.as_ref().and_then(|p| p.work_dir.clone()))
        .unwrap_or_else(|| DefaultsConfig::default().work_dir)
}

pub fn database(file: &FileConfig, cli: Option<&Path>) -> PathBuf {
    cli.map(Path::to_path_buf)
        .or_else(|| file.paths.as_ref().and_then(|p| p.database.clone()))
        .unwrap_or_else(|| DefaultsConfig::default().database)
}

pub fn processed_table_path(file: &FileConfig, dir: Option<&Path>, output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| work_dir(file, dir).join(PROCESSED_TABLE_NAME))
}

pub fn build_enhance_settings(args: &EnhanceArgs, file: &FileConfig) -> Result<EnhanceSettings> {
    let defaults = DefaultsConfig::default();
    let enhance_file = file.enhance.clone().unwrap_or_default();
    let dir = work_dir(file, args.work_dir.as_deref());

    let mut builder = EnhanceConfigBuilder::new()
        .work_dir(&dir)
        .contact_cutoff(
            args.contact_cutoff
                .or(enhance_file.contact_cutoff)
                .unwrap_or(defaults.contact_cutoff),
        );
    if let Some(path) = args.base_table.clone() {
        builder = builder.base_table_path(path);
    }
    if let Some(path) = args.structure_dir.clone().or(enhance_file.structure_dir) {
        builder = builder.structure_dir(path);
    }
    if let Some(path) = args.output.clone() {
        builder = builder.output_path(path);
    }

    Ok(EnhanceSettings {
        core: builder.build().map_err(|e| CliError::Config(e.to_string()))?,
        taxonomy: args.taxonomy.clone().or(enhance_file.taxonomy),
    })
}

pub fn build_import_settings(args: &ImportArgs, file: &FileConfig) -> Result<ImportSettings> {
    let defaults = DefaultsConfig::default();
    let import_file = file.import.clone().unwrap_or_default();

    let core = ImportConfigBuilder::new()
        .checkpoint_interval(
            args.checkpoint_interval
                .or(import_file.checkpoint_interval)
                .unwrap_or(defaults.checkpoint_interval),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ImportSettings {
        input: args
            .input
            .clone()
            .unwrap_or_else(|| work_dir(file, None).join(ENHANCED_TABLE_NAME)),
        database: database(file, args.database.as_deref()),
        core,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::config::file::{FileEnhanceConfig, FileImportConfig, FilePathsConfig};
    use clap::Parser;

    fn file_config() -> FileConfig {
        FileConfig {
            paths: Some(FilePathsConfig {
                work_dir: Some(PathBuf::from("/data/run")),
                database: Some(PathBuf::from("/data/ligbase.sqlite")),
            }),
            enhance: Some(FileEnhanceConfig {
                contact_cutoff: Some(4.0),
                ..Default::default()
            }),
            import: Some(FileImportConfig {
                checkpoint_interval: Some(50),
            }),
        }
    }

    fn enhance_args(extra: &[&str]) -> EnhanceArgs {
        let mut argv = vec!["ligbase", "enhance", "-m", "meta.json"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Enhance(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    fn import_args(extra: &[&str]) -> ImportArgs {
        let mut argv = vec!["ligbase", "import"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Import(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn file_values_fill_in_missing_arguments() {
        let settings = build_enhance_settings(&enhance_args(&[]), &file_config()).unwrap();
        assert_eq!(settings.core.contact_cutoff, 4.0);
        assert_eq!(
            settings.core.base_table_path,
            PathBuf::from("/data/run").join(PROCESSED_TABLE_NAME)
        );
        assert_eq!(settings.core.structure_dir, PathBuf::from("/data/run"));
    }

    #[test]
    fn arguments_override_file_values() {
        let args = enhance_args(&["--contact-cutoff", "6.5", "--structure-dir", "/pdb"]);
        let settings = build_enhance_settings(&args, &file_config()).unwrap();
        assert_eq!(settings.core.contact_cutoff, 6.5);
        assert_eq!(settings.core.structure_dir, PathBuf::from("/pdb"));
    }

    #[test]
    fn defaults_apply_without_a_config_file() {
        let settings = build_import_settings(&import_args(&[]), &FileConfig::default()).unwrap();
        assert_eq!(settings.core.checkpoint_interval, 10);
        assert_eq!(settings.database, PathBuf::from("ligbase.sqlite"));
        assert_eq!(settings.input, PathBuf::from(".").join(ENHANCED_TABLE_NAME));
    }

    #[test]
    fn invalid_values_are_configuration_errors() {
        let result = build_import_settings(&import_args(&["--checkpoint-interval", "0"]), &file_config());
        assert!(matches!(result, Err(CliError::Config(_))));

        let result = build_enhance_settings(&enhance_args(&["--contact-cutoff", "0"]), &file_config());
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
