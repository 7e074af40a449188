use crate::core::records::{BaseRecord, StructureStatus};
use crate::engine::processor::StructureProcessor;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tabular::{TableError, processed_table};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Processes every structure file and writes the base table to `output_path`.
///
/// Files that cannot be parsed still produce a row with status `failed`.
#[instrument(skip_all, name = "process_workflow")]
pub fn run(
    paths: &[PathBuf],
    output_path: &Path,
    reporter: &ProgressReporter,
) -> Result<Vec<BaseRecord>, TableError> {
    info!(files = paths.len(), "Processing structure files");
    reporter.report(Progress::StageStart {
        name: "Process",
        total_items: paths.len() as u64,
    });

    let processor = StructureProcessor::new();
    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let record = processor.process_file(path);
        if record.status == StructureStatus::Failed {
            reporter.report(Progress::ItemFailed {
                id: record.pdb_id.clone(),
                reason: "structure file could not be parsed".to_string(),
            });
        }
        reporter.report(Progress::ItemDone);
        records.push(record);
    }
    reporter.report(Progress::StageFinish);

    processed_table(&records)?.write(output_path)?;
    let failed = records
        .iter()
        .filter(|r| r.status == StructureStatus::Failed)
        .count();
    info!(
        processed = records.len() - failed,
        failed,
        output = %output_path.display(),
        "Wrote processed structures"
    );
    Ok(records)
}

/// Collects `*.pdb` files directly under `dir`, sorted by file name.
pub fn structure_files(dir: &Path) -> Result<Vec<PathBuf>, TableError> {
    let io_err = |source| TableError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_pdb = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdb"));
        if path.is_file() && is_pdb {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tabular::Table;
    use tempfile::tempdir;

    const PDB: &str = "\
ATOM      1  CA  MET A   1       0.000   0.000   0.000  1.00 20.00           C
ATOM      2  CA  SER A   2       3.800   0.000   0.000  1.00 20.00           C
HETATM    3  C1  LIG A 301       1.000   1.000   1.000  1.00 20.00           C
END
";

    #[test]
    fn writes_one_row_per_file_including_failures() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("1abc.pdb"), PDB).unwrap();
        std::fs::write(dir.path().join("2bad.PDB"), "REMARK nothing\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let paths = structure_files(dir.path()).unwrap();
        assert_eq!(paths.len(), 2);

        let output = dir.path().join("out").join("processed_structures.csv");
        let records = run(&paths, &output, &ProgressReporter::new()).unwrap();
        assert_eq!(records[0].status, StructureStatus::Processed);
        assert_eq!(records[1].status, StructureStatus::Failed);

        let table = Table::read(&output).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].value("pdb_id"), Some("1abc"));
        assert_eq!(table.rows[1].value("status"), Some("failed"));
    }
}
