use ligbase::core::records::{
    BaseRecord, BindingSiteInfo, ChainEntry, EnhancedLigand, EnrichedRecord, LigandEntry,
    LigandRecord, StructureRecord, StructureStatus,
};
use ligbase::engine::config::ImportConfig;
use ligbase::engine::error::ImportError;
use ligbase::engine::importer::Importer;
use ligbase::engine::progress::ProgressReporter;
use ligbase::engine::tabular::{Row, Table, enhanced_table};
use ligbase::store::{RowId, SqliteStore, StoreError, StructureStore};
use ligbase::workflows;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

fn enriched(pdb_id: &str) -> EnrichedRecord {
    let ligand = LigandEntry {
        ligand_id: "301".into(),
        insertion_code: None,
        residue_name: "ATP".into(),
        chain_id: "A".into(),
        num_atoms: 31,
        center: Some([1.5, -2.0, 0.25]),
        smiles: None,
    };
    EnrichedRecord {
        base: BaseRecord {
            pdb_id: pdb_id.into(),
            status: StructureStatus::Processed,
            num_models: 1,
            chains: vec![ChainEntry {
                chain_id: "A".into(),
                length: 250,
                residue_range: "1-250".into(),
            }],
            ligands: vec![ligand.clone()],
        },
        title: "Tyrosine kinase domain".into(),
        protein_families: vec!["kinase".into(), "transferase".into()],
        enhanced_ligands: Some(vec![EnhancedLigand {
            ligand,
            binding_site: BindingSiteInfo::empty(),
            properties: None,
        }]),
        ..Default::default()
    }
}

fn write_batch(count: usize) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let records: Vec<EnrichedRecord> = (1..=count).map(|i| enriched(&format!("t{i:03}"))).collect();
    let path = dir.path().join("enhanced_structures.csv");
    enhanced_table(&records).unwrap().write(&path).unwrap();
    (dir, path)
}

type Snapshot = Vec<(StructureRecord, Vec<LigandRecord>, Vec<String>)>;

fn snapshot(store: &SqliteStore, count: usize) -> Snapshot {
    (1..=count)
        .map(|i| {
            let id = format!("T{i:03}");
            (
                store.structure(&id).unwrap().unwrap(),
                store.ligands(&id).unwrap(),
                store.categories(&id).unwrap(),
            )
        })
        .collect()
}

fn import(store: &mut SqliteStore, path: &Path) -> ligbase::engine::importer::ImportSummary {
    workflows::import::run(store, path, &ImportConfig::default(), &ProgressReporter::new()).unwrap()
}

#[test]
fn reimporting_the_same_table_is_idempotent() {
    let (_dir, path) = write_batch(12);
    let mut store = SqliteStore::open_in_memory().unwrap();

    let first = import(&mut store, &path);
    assert_eq!((first.created, first.updated), (12, 0));
    let stats_before = store.stats().unwrap();
    let before = snapshot(&store, 12);

    let second = import(&mut store, &path);
    assert_eq!((second.created, second.updated), (0, 12));
    assert_eq!(store.stats().unwrap(), stats_before);
    assert_eq!(snapshot(&store, 12), before);

    assert_eq!(stats_before.protein_count, 12);
    assert_eq!(stats_before.ligand_count, 12);
    assert_eq!(stats_before.category_count, 2);
}

/// Delegates to SQLite but fails the n-th structure insert. Records the row
/// id of every inserted ligand.
struct FailingStore {
    inner: SqliteStore,
    fail_on_insert: usize,
    inserts: usize,
    ligand_ids: Vec<RowId>,
}

impl FailingStore {
    fn new(fail_on_insert: usize) -> Self {
        Self {
            inner: SqliteStore::open_in_memory().unwrap(),
            fail_on_insert,
            inserts: 0,
            ligand_ids: Vec::new(),
        }
    }
}

impl StructureStore for FailingStore {
    fn begin(&mut self) -> Result<(), StoreError> {
        self.inner.begin()
    }
    fn commit(&mut self) -> Result<(), StoreError> {
        self.inner.commit()
    }
    fn rollback(&mut self) -> Result<(), StoreError> {
        self.inner.rollback()
    }
    fn find_structure(&self, pdb_id: &str) -> Result<Option<RowId>, StoreError> {
        self.inner.find_structure(pdb_id)
    }
    fn insert_structure(&mut self, record: &StructureRecord) -> Result<RowId, StoreError> {
        self.inserts += 1;
        if self.inserts == self.fail_on_insert {
            return Err(StoreError::Internal("disk full".into()));
        }
        self.inner.insert_structure(record)
    }
    fn update_structure(&mut self, id: RowId, record: &StructureRecord) -> Result<(), StoreError> {
        self.inner.update_structure(id, record)
    }
    fn ensure_category(&mut self, name: &str) -> Result<RowId, StoreError> {
        self.inner.ensure_category(name)
    }
    fn add_structure_categories(&mut self, id: RowId, categories: &[RowId]) -> Result<(), StoreError> {
        self.inner.add_structure_categories(id, categories)
    }
    fn replace_structure_categories(
        &mut self,
        id: RowId,
        categories: &[RowId],
    ) -> Result<(), StoreError> {
        self.inner.replace_structure_categories(id, categories)
    }
    fn delete_ligands(&mut self, id: RowId) -> Result<usize, StoreError> {
        self.inner.delete_ligands(id)
    }
    fn insert_ligand(&mut self, id: RowId, ligand: &LigandRecord) -> Result<RowId, StoreError> {
        let ligand_id = self.inner.insert_ligand(id, ligand)?;
        self.ligand_ids.push(ligand_id);
        Ok(ligand_id)
    }
}

#[test]
fn failure_mid_batch_keeps_committed_segments_only() {
    let (_dir, path) = write_batch(50);
    let mut store = FailingStore::new(23);

    let result = workflows::import::run(
        &mut store,
        &path,
        &ImportConfig::default(),
        &ProgressReporter::new(),
    );
    match result {
        Err(ImportError::Fatal { row, pdb_id, .. }) => {
            assert_eq!(row, 23);
            assert_eq!(pdb_id, "T023");
        }
        other => panic!("expected a fatal import error, got {other:?}"),
    }

    let db = &store.inner;
    assert_eq!(db.stats().unwrap().protein_count, 20);
    assert!(db.structure("T020").unwrap().is_some());
    assert!(db.structure("T021").unwrap().is_none());
    assert!(db.structure("T022").unwrap().is_none());
    assert_eq!(db.ligands("T020").unwrap().len(), 1);
}

#[test]
fn reimport_keeps_structure_rows_but_reinserts_ligands() {
    let (_dir, path) = write_batch(3);
    let mut store = FailingStore::new(usize::MAX);
    let run = |store: &mut FailingStore| {
        workflows::import::run(store, &path, &ImportConfig::default(), &ProgressReporter::new())
            .unwrap()
    };

    run(&mut store);
    let structure_id = store.find_structure("T001").unwrap();
    let first = std::mem::take(&mut store.ligand_ids);

    run(&mut store);
    assert_eq!(store.find_structure("T001").unwrap(), structure_id);
    assert_eq!(store.ligand_ids.len(), first.len());
    assert!(store.ligand_ids.iter().all(|id| !first.contains(id)));
    assert_eq!(store.inner.stats().unwrap().ligand_count, 3);
}

#[test]
fn bare_string_family_becomes_a_single_category() {
    let table = Table {
        headers: vec!["pdb_id".into(), "protein_families".into()],
        rows: vec![Row::new().with("pdb_id", "4xyz").with("protein_families", "protease")],
    };
    let mut store = SqliteStore::open_in_memory().unwrap();
    let summary = Importer::new(&mut store, ImportConfig::default())
        .import_table(&table, &ProgressReporter::new())
        .unwrap();

    assert!(summary.parse_failures.is_empty());
    assert_eq!(store.categories("4XYZ").unwrap(), vec!["protease".to_string()]);
    let category = store.category("protease").unwrap().unwrap();
    assert_eq!(category.description, "Protein family: protease");
}

#[test]
fn missing_source_file_is_reported() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let result = workflows::import::run(
        &mut store,
        Path::new("/no/such/enhanced_structures.csv"),
        &ImportConfig::default(),
        &ProgressReporter::new(),
    );
    assert!(matches!(result, Err(ImportError::Source(_))));
}
