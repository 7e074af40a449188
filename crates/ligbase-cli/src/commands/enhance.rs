use crate::cli::EnhanceArgs;
use crate::config::builder::build_enhance_settings;
use crate::config::file::FileConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ligbase::core::classify::family::FamilyTaxonomy;
use ligbase::engine::enhancer::load_metadata;
use ligbase::engine::progress::ProgressReporter;
use ligbase::workflows;
use tracing::{debug, info};

pub fn run(args: EnhanceArgs, file: &FileConfig) -> Result<()> {
    let settings = build_enhance_settings(&args, file)?;

    let taxonomy = match &settings.taxonomy {
        Some(path) => {
            info!("Loading protein family taxonomy from {:?}", path);
            let taxonomy = FamilyTaxonomy::load(path)?;
            debug!(families = ?taxonomy.tags().collect::<Vec<_>>(), "Loaded family taxonomy");
            taxonomy
        }
        None => FamilyTaxonomy::default(),
    };

    info!("Loading structure metadata from {:?}", &args.metadata);
    let metadata = load_metadata(&args.metadata)?;
    let ids: Vec<String> = if args.ids.is_empty() {
        metadata.keys().cloned().collect()
    } else {
        args.ids.clone()
    };

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let report = workflows::enhance::run(&settings.core, &taxonomy, &ids, &metadata, &reporter)?;

    if report.records.is_empty() {
        println!("No structures were enhanced.");
    } else {
        println!(
            "Enhanced {} structure(s) into {}",
            report.records.len(),
            settings.core.output_path.display()
        );
    }
    for failure in &report.failures {
        println!("  Skipped {}: {}", failure.pdb_id, failure.reason);
    }
    Ok(())
}
