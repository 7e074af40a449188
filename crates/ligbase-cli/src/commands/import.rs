use crate::cli::ImportArgs;
use crate::config::builder::build_import_settings;
use crate::config::file::FileConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ligbase::engine::progress::ProgressReporter;
use ligbase::store::SqliteStore;
use ligbase::workflows;
use tracing::info;

pub fn run(args: ImportArgs, file: &FileConfig) -> Result<()> {
    let settings = build_import_settings(&args, file)?;

    info!("Opening database {:?}", &settings.database);
    let mut store = SqliteStore::open(&settings.database)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let summary = workflows::import::run(&mut store, &settings.input, &settings.core, &reporter)?;

    println!(
        "Imported {} structure(s): {} created, {} updated, {} skipped",
        summary.imported(),
        summary.created,
        summary.updated,
        summary.skipped
    );
    if !summary.parse_failures.is_empty() {
        println!(
            "{} field(s) could not be parsed and were defaulted:",
            summary.parse_failures.len()
        );
        for failure in &summary.parse_failures {
            println!("  {} {}", failure.pdb_id, failure.field);
        }
    }

    let stats = store.stats()?;
    println!(
        "Database now holds {} protein(s), {} ligand(s), {} categories",
        stats.protein_count, stats.ligand_count, stats.category_count
    );
    Ok(())
}
