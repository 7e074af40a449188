use crate::engine::config::ImportConfig;
use crate::engine::error::ImportError;
use crate::engine::importer::{ImportSummary, Importer};
use crate::engine::progress::ProgressReporter;
use crate::store::StructureStore;
use std::path::Path;
use tracing::instrument;

/// Reconciles the enhanced table at `path` into `store`.
///
/// Re-running over the same table leaves the stored content unchanged.
/// Structure rows keep their ids and get a new `updated_at`; ligand rows are
/// deleted and re-inserted, so their row ids change.
#[instrument(skip_all, name = "import_workflow", fields(path = %path.display()))]
pub fn run<S: StructureStore>(
    store: &mut S,
    path: &Path,
    config: &ImportConfig,
    reporter: &ProgressReporter,
) -> Result<ImportSummary, ImportError> {
    Importer::new(store, config.clone()).import_path(path, reporter)
}
