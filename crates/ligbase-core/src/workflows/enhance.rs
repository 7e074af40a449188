use crate::core::classify::family::FamilyTaxonomy;
use crate::core::records::EnrichedRecord;
use crate::core::utils::identifiers::normalize_pdb_id;
use crate::engine::config::EnhanceConfig;
use crate::engine::enhancer::{Enhancer, MetadataIndex, StructureMetadata};
use crate::engine::error::EnhanceError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tabular::enhanced_table;
use tracing::{info, instrument, warn};

/// A structure the batch could not enhance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhanceFailure {
    pub pdb_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct EnhanceReport {
    pub records: Vec<EnrichedRecord>,
    pub failures: Vec<EnhanceFailure>,
}

/// Enhances each requested structure independently and writes the successes to
/// `config.output_path`.
///
/// Ids without metadata are enhanced from an empty metadata record. The output
/// table is only written when at least one structure succeeded; an existing
/// file is replaced.
#[instrument(skip_all, name = "enhance_workflow")]
pub fn run(
    config: &EnhanceConfig,
    taxonomy: &FamilyTaxonomy,
    pdb_ids: &[String],
    metadata: &MetadataIndex,
    reporter: &ProgressReporter,
) -> Result<EnhanceReport, EnhanceError> {
    let enhancer = Enhancer::new(config.clone(), taxonomy)?;
    run_with(&enhancer, pdb_ids, metadata, reporter)
}

/// Same as [`run`] over an already constructed [`Enhancer`].
pub fn run_with(
    enhancer: &Enhancer,
    pdb_ids: &[String],
    metadata: &MetadataIndex,
    reporter: &ProgressReporter,
) -> Result<EnhanceReport, EnhanceError> {
    info!(structures = pdb_ids.len(), "Enhancing structures");
    reporter.report(Progress::StageStart {
        name: "Enhance",
        total_items: pdb_ids.len() as u64,
    });

    let empty = StructureMetadata::default();
    let mut report = EnhanceReport::default();
    for pdb_id in pdb_ids {
        let entry = metadata.get(&normalize_pdb_id(pdb_id)).unwrap_or(&empty);
        match enhancer.enhance(pdb_id, entry) {
            Ok(record) => report.records.push(record),
            Err(e) => {
                warn!(pdb_id = %pdb_id, error = %e, "Structure skipped");
                reporter.report(Progress::ItemFailed {
                    id: pdb_id.clone(),
                    reason: e.to_string(),
                });
                report.failures.push(EnhanceFailure {
                    pdb_id: pdb_id.clone(),
                    reason: e.to_string(),
                });
            }
        }
        reporter.report(Progress::ItemDone);
    }
    reporter.report(Progress::StageFinish);

    let output = &enhancer.config().output_path;
    if report.records.is_empty() {
        warn!("No structures were enhanced; output not written");
    } else {
        enhanced_table(&report.records)?.write(output)?;
        info!(
            enhanced = report.records.len(),
            failed = report.failures.len(),
            output = %output.display(),
            "Wrote enhanced structures"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::{BaseRecord, StructureStatus};
    use crate::engine::config::EnhanceConfigBuilder;
    use crate::engine::tabular::Table;
    use tempfile::tempdir;

    fn base(pdb_id: &str) -> BaseRecord {
        BaseRecord {
            pdb_id: pdb_id.into(),
            status: StructureStatus::Processed,
            num_models: 1,
            chains: Vec::new(),
            ligands: Vec::new(),
        }
    }

    #[test]
    fn unknown_ids_are_reported_and_others_written() {
        let dir = tempdir().unwrap();
        let config = EnhanceConfigBuilder::new().work_dir(dir.path()).build().unwrap();
        let taxonomy = FamilyTaxonomy::default();
        let enhancer = Enhancer::with_records(config.clone(), &taxonomy, vec![base("1abc")]);

        let mut metadata = MetadataIndex::new();
        metadata.insert(
            "1ABC".into(),
            StructureMetadata {
                title: Some("Tyrosine kinase domain".into()),
                ..Default::default()
            },
        );

        let ids = vec!["1abc".to_string(), "9zzz".to_string()];
        let report = run_with(&enhancer, &ids, &metadata, &ProgressReporter::new()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].protein_families, vec!["kinase".to_string()]);
        assert_eq!(report.failures[0].pdb_id, "9zzz");

        let table = Table::read(&config.output_path).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].value("title"), Some("Tyrosine kinase domain"));
    }

    #[test]
    fn nothing_is_written_when_every_structure_fails() {
        let dir = tempdir().unwrap();
        let config = EnhanceConfigBuilder::new().work_dir(dir.path()).build().unwrap();
        let taxonomy = FamilyTaxonomy::default();
        let enhancer = Enhancer::with_records(config.clone(), &taxonomy, Vec::new());

        let report = run_with(
            &enhancer,
            &["1abc".to_string()],
            &MetadataIndex::new(),
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(report.records.is_empty());
        assert!(!config.output_path.exists());
    }

    #[test]
    fn missing_base_table_is_an_error() {
        let dir = tempdir().unwrap();
        let config = EnhanceConfigBuilder::new().work_dir(dir.path()).build().unwrap();
        let taxonomy = FamilyTaxonomy::default();
        let result = run(&config, &taxonomy, &[], &MetadataIndex::new(), &ProgressReporter::new());
        assert!(matches!(result, Err(EnhanceError::Table(_))));
    }
}
