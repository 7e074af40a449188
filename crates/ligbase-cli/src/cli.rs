use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ligbase - Enrich deposited protein-ligand structures and reconcile them into a relational store.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reduce a directory of PDB files to the base table.
    Process(ProcessArgs),
    /// Enrich base records with metadata, binding pockets and ligand properties.
    Enhance(EnhanceArgs),
    /// Reconcile an enhanced table into the structure database.
    Import(ImportArgs),
    /// Show row counts of the structure database.
    Stats(StatsArgs),
    /// Compute druglikeness properties for a SMILES string.
    Properties(PropertiesArgs),
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Directory containing `<pdb_id>.pdb` files. Defaults to the configured work directory.
    #[arg(short, long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Output path for the base table.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct EnhanceArgs {
    /// JSON file of per-structure metadata keyed by PDB id.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub metadata: PathBuf,

    /// Directory holding the base table and structure files.
    #[arg(short, long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Override the base table path.
    #[arg(long, value_name = "PATH")]
    pub base_table: Option<PathBuf>,

    /// Override the structure file directory.
    #[arg(long, value_name = "DIR")]
    pub structure_dir: Option<PathBuf>,

    /// Override the output table path.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Contact cutoff in Ångström for binding-site residues.
    #[arg(long, value_name = "FLOAT")]
    pub contact_cutoff: Option<f64>,

    /// TOML file with a `[families]` table replacing the built-in taxonomy.
    #[arg(long, value_name = "PATH")]
    pub taxonomy: Option<PathBuf>,

    /// Structures to enhance. Can be used multiple times; defaults to every id in the metadata file.
    #[arg(long = "id", value_name = "PDB_ID")]
    pub ids: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Enhanced table to import.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// SQLite database file. Created if it does not exist.
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Rows committed per transaction segment.
    #[arg(long, value_name = "INT")]
    pub checkpoint_interval: Option<usize>,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// SQLite database file.
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// List the structures tagged with this protein family.
    #[arg(long, value_name = "NAME")]
    pub category: Option<String>,
}

#[derive(Args, Debug)]
pub struct PropertiesArgs {
    /// Ligand in SMILES notation.
    #[arg(required = true)]
    pub smiles: String,

    /// Store the result on a ligand of this structure.
    #[arg(long, value_name = "PDB_ID", requires_all = ["chain_id", "residue_id", "residue_name"])]
    pub pdb_id: Option<String>,

    #[arg(long, value_name = "ID")]
    pub chain_id: Option<String>,

    #[arg(long, value_name = "ID")]
    pub residue_id: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub residue_name: Option<String>,

    /// SQLite database file, used with --pdb-id.
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn enhance_accepts_repeated_ids() {
        let cli = Cli::parse_from([
            "ligbase", "enhance", "-m", "meta.json", "--id", "1abc", "--id", "2xyz",
        ]);
        match cli.command {
            Commands::Enhance(args) => assert_eq!(args.ids, vec!["1abc", "2xyz"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn storing_properties_requires_the_full_ligand_key() {
        let result = Cli::try_parse_from(["ligbase", "properties", "CCO", "--pdb-id", "1abc"]);
        assert!(result.is_err());
    }
}
