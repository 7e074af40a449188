use crate::cli::StatsArgs;
use crate::config::builder::database;
use crate::config::file::FileConfig;
use crate::error::{CliError, Result};
use ligbase::store::SqliteStore;

pub fn run(args: StatsArgs, file: &FileConfig) -> Result<()> {
    let path = database(file, args.database.as_deref());
    if !path.exists() {
        return Err(CliError::Config(format!(
            "Database {} does not exist. Run 'ligbase import' first.",
            path.display()
        )));
    }
    let store = SqliteStore::open(&path)?;

    let stats = store.stats()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).map_err(anyhow::Error::from)?
    );

    if let Some(name) = &args.category {
        let structures = store.structures_by_category(name)?;
        println!("{} structure(s) tagged '{}':", structures.len(), name);
        for structure in structures {
            println!("  {}  {}", structure.pdb_id, structure.title);
        }
    }
    Ok(())
}
