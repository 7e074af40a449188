use crate::cli::ProcessArgs;
use crate::config::builder::{processed_table_path, work_dir};
use crate::config::file::FileConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ligbase::core::records::StructureStatus;
use ligbase::engine::progress::ProgressReporter;
use ligbase::workflows;
use tracing::{info, warn};

pub fn run(args: ProcessArgs, file: &FileConfig) -> Result<()> {
    let input_dir = work_dir(file, args.input_dir.as_deref());
    let output = processed_table_path(file, args.input_dir.as_deref(), args.output.as_deref());

    let paths = workflows::process::structure_files(&input_dir)?;
    info!("Found {} structure file(s) in {:?}", paths.len(), &input_dir);
    if paths.is_empty() {
        warn!("No .pdb files found; the base table will be empty.");
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let records = workflows::process::run(&paths, &output, &reporter)?;

    let failed = records
        .iter()
        .filter(|r| r.status == StructureStatus::Failed)
        .count();
    println!(
        "Processed {} structure(s) ({} failed) into {}",
        records.len(),
        failed,
        output.display()
    );
    Ok(())
}
