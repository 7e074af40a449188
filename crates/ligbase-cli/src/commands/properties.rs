use crate::cli::PropertiesArgs;
use crate::config::builder::database;
use crate::config::file::FileConfig;
use crate::error::{CliError, Result};
use ligbase::core::chem::properties::PropertyCalculator;
use ligbase::store::SqliteStore;
use tracing::info;

pub fn run(args: PropertiesArgs, file: &FileConfig) -> Result<()> {
    let properties = PropertyCalculator::new().compute(&args.smiles)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&properties).map_err(anyhow::Error::from)?
    );

    let (Some(pdb_id), Some(chain_id), Some(residue_id), Some(residue_name)) = (
        &args.pdb_id,
        &args.chain_id,
        &args.residue_id,
        &args.residue_name,
    ) else {
        return Ok(());
    };

    let path = database(file, args.database.as_deref());
    let mut store = SqliteStore::open(&path)?;
    let updated = store.update_ligand_properties(
        pdb_id,
        chain_id,
        residue_id,
        residue_name,
        Some(args.smiles.as_str()),
        &properties,
    )?;
    if updated == 0 {
        return Err(CliError::Config(format!(
            "No ligand {residue_name} {chain_id}:{residue_id} stored for {pdb_id}"
        )));
    }
    info!(pdb_id = %pdb_id, updated, "Stored ligand properties");
    println!("Stored properties on {updated} ligand row(s).");
    Ok(())
}
