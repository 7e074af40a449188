use super::config::ImportConfig;
use super::enhancer::number_from_value;
use super::error::ImportError;
use super::progress::{Progress, ProgressReporter};
use super::tabular::{Row, Table};
use crate::core::chem::properties::LigandProperties;
use crate::core::classify::quality::QualityTier;
use crate::core::parsing::{FieldParser, is_missing_cell};
use crate::core::records::{
    ChainLayout, ChainSummary, LigandRecord, StructureRecord, StructureStatus,
    ligand_id_from_value,
};
use crate::core::utils::identifiers::normalize_pdb_id;
use crate::store::{RowId, StoreError, StructureStore};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Section of the binding-metrics mapping searched after the top level.
const NESTED_METRICS_KEY: &str = "ligand_binding";

/// A field that could not be decoded and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    pub pdb_id: String,
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub parse_failures: Vec<ParseFailure>,
}

impl ImportSummary {
    /// Rows written to the store, counting creates and updates.
    pub fn imported(&self) -> usize {
        self.created + self.updated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated,
    Skipped,
}

/// Reconciles rows of the enhancement table into a [`StructureStore`].
pub struct Importer<'s, S: StructureStore> {
    store: &'s mut S,
    config: ImportConfig,
    parser: FieldParser,
}

impl<'s, S: StructureStore> Importer<'s, S> {
    pub fn new(store: &'s mut S, config: ImportConfig) -> Self {
        Self {
            store,
            config,
            parser: FieldParser::default(),
        }
    }

    pub fn with_parser(mut self, parser: FieldParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn import_path(
        &mut self,
        path: &Path,
        reporter: &ProgressReporter,
    ) -> Result<ImportSummary, ImportError> {
        let table = Table::read(path)?;
        table.require_column("pdb_id", path)?;
        info!(path = %path.display(), rows = table.rows.len(), "Importing enhanced structures");
        self.import_table(&table, reporter)
    }

    /// Imports every row, committing after each `checkpoint_interval` created or
    /// updated rows and once more at the end.
    ///
    /// A store failure rolls back the open segment and aborts the batch;
    /// segments committed earlier stay in place.
    pub fn import_table(
        &mut self,
        table: &Table,
        reporter: &ProgressReporter,
    ) -> Result<ImportSummary, ImportError> {
        let mut summary = ImportSummary::default();
        reporter.report(Progress::StageStart {
            name: "Import",
            total_items: table.rows.len() as u64,
        });

        if let Err(e) = self.store.begin() {
            return Err(self.abort(0, String::new(), e));
        }

        for (index, row) in table.rows.iter().enumerate() {
            let row_number = index + 1;
            match self.import_row(row, &mut summary) {
                Ok(RowOutcome::Skipped) => {}
                Ok(_) if summary.imported() % self.config.checkpoint_interval == 0 => {
                    if let Err(e) = self.checkpoint() {
                        let pdb_id = row_pdb_id(row);
                        return Err(self.abort(row_number, pdb_id, e));
                    }
                    info!(committed = summary.imported(), "Checkpoint committed");
                    reporter.report(Progress::Checkpoint {
                        committed_rows: summary.imported(),
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    let pdb_id = row_pdb_id(row);
                    reporter.report(Progress::ItemFailed {
                        id: pdb_id.clone(),
                        reason: e.to_string(),
                    });
                    return Err(self.abort(row_number, pdb_id, e));
                }
            }
            reporter.report(Progress::ItemDone);
        }

        if let Err(e) = self.store.commit() {
            return Err(self.abort(table.rows.len(), String::new(), e));
        }
        reporter.report(Progress::StageFinish);
        info!(
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            parse_failures = summary.parse_failures.len(),
            "Import finished"
        );
        Ok(summary)
    }

    /// Imports one row inside the currently open segment.
    pub fn import_row(
        &mut self,
        row: &Row,
        summary: &mut ImportSummary,
    ) -> Result<RowOutcome, StoreError> {
        let Some(pdb_id) = row.value("pdb_id").map(normalize_pdb_id) else {
            warn!("Row without pdb_id skipped");
            summary.skipped += 1;
            return Ok(RowOutcome::Skipped);
        };

        let mut fields = RowFields {
            row,
            pdb_id: &pdb_id,
            parser: &self.parser,
            failures: &mut summary.parse_failures,
        };
        let record = fields.structure_record();
        let families = fields.families();
        let ligands = fields.ligands();

        let (structure_id, outcome) = match self.store.find_structure(&pdb_id)? {
            Some(id) => {
                self.store.update_structure(id, &record)?;
                (id, RowOutcome::Updated)
            }
            None => (self.store.insert_structure(&record)?, RowOutcome::Created),
        };

        let category_ids = families
            .iter()
            .map(|name| self.store.ensure_category(name))
            .collect::<Result<Vec<RowId>, _>>()?;

        if outcome == RowOutcome::Updated {
            self.store
                .replace_structure_categories(structure_id, &category_ids)?;
            let removed = self.store.delete_ligands(structure_id)?;
            debug!(pdb_id = %pdb_id, removed, "Replaced previous ligands");
            summary.updated += 1;
        } else {
            self.store
                .add_structure_categories(structure_id, &category_ids)?;
            summary.created += 1;
        }

        for ligand in &ligands {
            self.store.insert_ligand(structure_id, ligand)?;
        }

        debug!(
            pdb_id = %pdb_id,
            ?outcome,
            categories = category_ids.len(),
            ligands = ligands.len(),
            "Imported row"
        );
        Ok(outcome)
    }

    fn checkpoint(&mut self) -> Result<(), StoreError> {
        self.store.commit()?;
        self.store.begin()
    }

    fn abort(&mut self, row: usize, pdb_id: String, source: StoreError) -> ImportError {
        error!(row, pdb_id = %pdb_id, error = %source, "Import failed; rolling back open segment");
        if let Err(e) = self.store.rollback() {
            error!(error = %e, "Rollback failed");
        }
        ImportError::Fatal {
            row,
            pdb_id,
            source,
        }
    }
}

fn row_pdb_id(row: &Row) -> String {
    row.value("pdb_id").map(normalize_pdb_id).unwrap_or_default()
}

/// Decodes the cells of one row, recording every defaulted field.
struct RowFields<'r> {
    row: &'r Row,
    pdb_id: &'r str,
    parser: &'r FieldParser,
    failures: &'r mut Vec<ParseFailure>,
}

impl<'r> RowFields<'r> {
    fn raw(&self, column: &str) -> Option<&'r str> {
        let row: &'r Row = self.row;
        row.value(column)
    }

    fn fail(&mut self, field: &str, reason: &dyn Display) {
        warn!(pdb_id = self.pdb_id, field, %reason, "Field could not be parsed; using default");
        self.failures.push(ParseFailure {
            pdb_id: self.pdb_id.to_string(),
            field: field.to_string(),
        });
    }

    fn structured(&mut self, column: &str) -> Option<Value> {
        let raw = self.raw(column)?;
        match self.parser.parse(raw) {
            Ok(parsed) => Some(parsed.value),
            Err(e) => {
                self.fail(column, &e);
                None
            }
        }
    }

    /// A value nested inside a structured cell. Strings are re-serialized
    /// payloads and go through the parser like a top-level cell.
    fn nested(&mut self, field: &str, value: Option<&Value>) -> Option<Value> {
        match value? {
            Value::Null => None,
            Value::String(raw) if is_missing_cell(raw) => None,
            Value::String(raw) => match self.parser.parse(raw) {
                Ok(parsed) => Some(parsed.value),
                Err(e) => {
                    self.fail(field, &e);
                    None
                }
            },
            other => Some(other.clone()),
        }
    }

    /// A structured cell that must decode to a mapping; anything else is
    /// defaulted to an empty one.
    fn mapping(&mut self, column: &str) -> Value {
        match self.structured(column) {
            Some(value @ Value::Object(_)) => value,
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(_) => {
                self.fail(column, &"expected a mapping");
                Value::Object(Map::new())
            }
        }
    }

    fn structure_record(&mut self) -> StructureRecord {
        let title = self.raw("title").unwrap_or_default().to_string();
        let status = match self.raw("status") {
            None => StructureStatus::Pending,
            Some(raw) => raw.parse::<StructureStatus>().unwrap_or_else(|e| {
                self.fail("status", &e);
                StructureStatus::Pending
            }),
        };
        let quality = match self.raw("experimental_quality") {
            None => QualityTier::UnknownQuality,
            Some(raw) => raw.parse::<QualityTier>().unwrap_or_else(|e| {
                self.fail("experimental_quality", &e);
                QualityTier::UnknownQuality
            }),
        };
        let chains = self.chains();
        let num_chains = match self.raw("num_chains") {
            None => chains.len() as i64,
            Some(raw) => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => n as i64,
                _ => {
                    self.fail("num_chains", &"not a number");
                    chains.len() as i64
                }
            },
        };

        let conditions = self.mapping("experimental_conditions");
        let method = conditions
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        StructureRecord {
            pdb_id: self.pdb_id.to_string(),
            title,
            description: format!(
                "Enhanced structure {} from categorization pipeline",
                self.pdb_id
            ),
            resolution: conditions.get("resolution").and_then(number_from_value),
            temperature: conditions.get("temperature").and_then(number_from_value),
            experiment_method: method,
            quality: quality.as_str().to_string(),
            num_chains,
            chains,
            experimental_conditions: conditions,
            status,
        }
    }

    fn chains(&mut self) -> ChainLayout {
        let Some(value) = self.structured("chains") else {
            return ChainLayout::new();
        };
        chain_layout(&value).unwrap_or_else(|| {
            self.fail("chains", &"unexpected chain layout");
            ChainLayout::new()
        })
    }

    /// Family tags. A cell that no strategy can decode is taken as one bare
    /// family name.
    fn families(&mut self) -> Vec<String> {
        let Some(raw) = self.raw("protein_families") else {
            return Vec::new();
        };
        let names: Vec<String> = match self.parser.parse(raw).map(|p| p.value) {
            Ok(Value::Array(items)) => items.iter().filter_map(value_as_text).collect(),
            Ok(Value::String(name)) => vec![name],
            Ok(Value::Null) => Vec::new(),
            Ok(_) => {
                self.fail("protein_families", &"expected a list of names");
                Vec::new()
            }
            Err(_) => {
                debug!(pdb_id = self.pdb_id, raw, "Treating protein_families as a single name");
                vec![raw.to_string()]
            }
        };

        let mut unique: Vec<String> = Vec::with_capacity(names.len());
        for name in names.into_iter().map(|n| n.trim().to_string()) {
            if !name.is_empty() && !unique.contains(&name) {
                unique.push(name);
            }
        }
        unique
    }

    /// Ligands from `enhanced_ligands`, falling back to `ligands`.
    fn ligands(&mut self) -> Vec<LigandRecord> {
        let column = if self.raw("enhanced_ligands").is_some() {
            "enhanced_ligands"
        } else {
            "ligands"
        };
        let items = match self.structured(column) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                self.fail(column, &"expected a list of ligands");
                Vec::new()
            }
        };
        let metrics = self.mapping("binding_metrics");

        items
            .iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(self.ligand(fields, &metrics)),
                _ => {
                    self.fail(column, &"ligand entry is not a mapping");
                    None
                }
            })
            .collect()
    }

    fn ligand(&mut self, item: &Map<String, Value>, metrics: &Value) -> LigandRecord {
        let chain_id = item.get("chain_id").and_then(value_as_text).unwrap_or_default();
        let mut residue_id = item
            .get("ligand_id")
            .or_else(|| item.get("residue_id"))
            .map(ligand_id_from_value)
            .unwrap_or_default();
        if let Some(code) = item
            .get("insertion_code")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|code| !code.is_empty())
        {
            residue_id.push_str(code);
        }
        let residue_name = item
            .get("residue_name")
            .and_then(value_as_text)
            .unwrap_or_default();

        let properties = match item.get("properties") {
            None | Some(Value::Null) => None,
            Some(value) => match serde_json::from_value::<LigandProperties>(value.clone()) {
                Ok(properties) => Some(properties),
                Err(e) => {
                    self.fail("ligand_properties", &e);
                    None
                }
            },
        };

        let center = match self.nested("center", item.get("center")) {
            None => [0.0; 3],
            Some(value) => center_of(&value).unwrap_or_else(|| {
                self.fail("center", &"expected three coordinates");
                [0.0; 3]
            }),
        };
        let binding_site = match self.nested("binding_site", item.get("binding_site")) {
            Some(value @ Value::Object(_)) => value,
            None => Value::Object(Map::new()),
            Some(_) => {
                self.fail("binding_site", &"expected a mapping");
                Value::Object(Map::new())
            }
        };

        LigandRecord {
            num_atoms: item
                .get("num_atoms")
                .and_then(number_from_value)
                .map(|n| n as i64)
                .unwrap_or(0),
            center,
            smiles: item
                .get("smiles")
                .and_then(Value::as_str)
                .map(str::to_string),
            properties,
            binding_site,
            binding_metrics: ligand_binding_metrics(metrics, &chain_id, &residue_id, &residue_name),
            chain_id,
            residue_id,
            residue_name,
        }
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn center_of(value: &Value) -> Option<[f64; 3]> {
    let items = value.as_array()?;
    if items.len() != 3 {
        return None;
    }
    Some([
        number_from_value(&items[0])?,
        number_from_value(&items[1])?,
        number_from_value(&items[2])?,
    ])
}

/// Accepts either `[{chain_id, length, residue_range}, ...]` or
/// `{chain_id: {length, residue_range}}`.
fn chain_layout(value: &Value) -> Option<ChainLayout> {
    fn summary(entry: &Value) -> Option<ChainSummary> {
        Some(ChainSummary {
            length: number_from_value(entry.get("length")?)? as usize,
            residue_range: entry
                .get("residue_range")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    match value {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| Some((value_as_text(entry.get("chain_id")?)?, summary(entry)?)))
            .collect(),
        Value::Object(entries) => entries
            .iter()
            .map(|(chain_id, entry)| Some((chain_id.clone(), summary(entry)?)))
            .collect(),
        _ => None,
    }
}

/// Finds the metrics of one ligand. Candidate keys are tried in order, each
/// at the top level and then under the nested section; the first key present
/// wins even when its value is empty.
fn ligand_binding_metrics(
    metrics: &Value,
    chain_id: &str,
    residue_id: &str,
    residue_name: &str,
) -> Value {
    let candidates = [
        format!("{chain_id}_{residue_id}"),
        residue_name.to_string(),
        format!("{chain_id}:{residue_name}"),
    ];
    let nested = metrics.get(NESTED_METRICS_KEY);
    candidates
        .iter()
        .find_map(|key| {
            metrics
                .get(key.as_str())
                .or_else(|| nested.and_then(|n| n.get(key.as_str())))
        })
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ImportConfigBuilder;
    use crate::store::SqliteStore;
    use serde_json::json;

    fn row(pdb_id: &str) -> Row {
        Row::new()
            .with("pdb_id", pdb_id)
            .with("title", "Tyrosine kinase domain")
            .with("status", "processed")
            .with("num_chains", "1")
            .with("chains", r#"[{"chain_id": "A", "length": 250, "residue_range": "1-250"}]"#)
            .with("protein_families", "['kinase']")
            .with("experimental_quality", "good_quality")
            .with(
                "experimental_conditions",
                "{'method': 'X-RAY DIFFRACTION', 'temperature': None, 'resolution': 2.0}",
            )
            .with("binding_metrics", r#"{"ATP": {"Kd": {"value": 12.5, "unit": "nM"}}}"#)
            .with(
                "enhanced_ligands",
                r#"[{"ligand_id": "301", "residue_name": "ATP", "chain_id": "A", "num_atoms": 31, "center": [1.0, 2.0, 3.0], "binding_site": {"num_binding_residues": 4}}]"#,
            )
    }

    fn import(store: &mut SqliteStore, rows: Vec<Row>) -> Result<ImportSummary, ImportError> {
        let table = Table {
            headers: Vec::new(),
            rows,
        };
        Importer::new(store, ImportConfig::default()).import_table(&table, &ProgressReporter::new())
    }

    #[test]
    fn creates_structure_categories_and_ligands() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let summary = import(&mut store, vec![row("1abc")]).unwrap();
        assert_eq!(summary.created, 1);
        assert!(summary.parse_failures.is_empty());

        let stored = store.structure("1ABC").unwrap().unwrap();
        assert_eq!(stored.resolution, Some(2.0));
        assert_eq!(stored.temperature, None);
        assert_eq!(stored.experiment_method, "X-RAY DIFFRACTION");
        assert_eq!(stored.quality, "good_quality");
        assert_eq!(stored.chains["A"].residue_range, "1-250");
        assert_eq!(
            stored.description,
            "Enhanced structure 1ABC from categorization pipeline"
        );
        assert_eq!(store.categories("1abc").unwrap(), vec!["kinase"]);

        let ligands = store.ligands("1abc").unwrap();
        assert_eq!(ligands.len(), 1);
        assert_eq!(ligands[0].binding_metrics, json!({"Kd": {"value": 12.5, "unit": "nM"}}));
        assert_eq!(ligands[0].binding_site["num_binding_residues"], 4);
    }

    #[test]
    fn reimport_updates_in_place_and_replaces_categories() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        import(&mut store, vec![row("1abc")]).unwrap();

        let changed = row("1ABC")
            .with("title", "Serine protease")
            .with("protein_families", r#"["protease"]"#);
        let summary = import(&mut store, vec![changed]).unwrap();
        assert_eq!((summary.created, summary.updated), (0, 1));

        assert_eq!(store.structure("1abc").unwrap().unwrap().title, "Serine protease");
        assert_eq!(store.categories("1abc").unwrap(), vec!["protease"]);
        assert_eq!(store.ligands("1abc").unwrap().len(), 1);
        let stats = store.stats().unwrap();
        assert_eq!((stats.protein_count, stats.ligand_count, stats.category_count), (1, 1, 2));
    }

    #[test]
    fn rows_without_pdb_id_are_skipped() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let summary = import(&mut store, vec![Row::new().with("title", "orphan"), row("1abc")])
            .unwrap();
        assert_eq!((summary.created, summary.skipped), (1, 1));
    }

    #[test]
    fn malformed_fields_default_and_are_reported() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let bad = row("1abc")
            .with("status", "archived")
            .with("chains", "{{{")
            .with("experimental_conditions", "[1, 2]")
            .with("enhanced_ligands", r#"[{"residue_name": "HEM", "chain_id": "B", "center": "nowhere"}, 7]"#);
        let summary = import(&mut store, vec![bad]).unwrap();

        let fields: Vec<&str> = summary
            .parse_failures
            .iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(
            fields,
            vec!["status", "chains", "experimental_conditions", "center", "enhanced_ligands"]
        );
        assert!(summary.parse_failures.iter().all(|f| f.pdb_id == "1ABC"));

        let stored = store.structure("1abc").unwrap().unwrap();
        assert_eq!(stored.status, StructureStatus::Pending);
        assert!(stored.chains.is_empty());
        assert_eq!(stored.num_chains, 1);
        assert_eq!(stored.experimental_conditions, json!({}));

        let ligands = store.ligands("1abc").unwrap();
        assert_eq!(ligands.len(), 1);
        assert_eq!(ligands[0].center, [0.0, 0.0, 0.0]);
        assert_eq!(ligands[0].residue_id, "");
        assert_eq!(ligands[0].binding_site, json!({}));
    }

    #[test]
    fn string_encoded_center_and_binding_site_are_parsed() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let encoded = row("1abc").with(
            "enhanced_ligands",
            r#"[{"ligand_id": "301", "residue_name": "ATP", "chain_id": "A", "center": "[1.0, 2.0, 3.0]", "binding_site": "{'num_binding_residues': 4}"}, {"ligand_id": "302", "residue_name": "MG", "chain_id": "A", "center": "[1.0, 2.0]", "binding_site": "nan"}]"#,
        );
        let summary = import(&mut store, vec![encoded]).unwrap();

        let fields: Vec<&str> = summary
            .parse_failures
            .iter()
            .map(|f| f.field.as_str())
            .collect();
        assert_eq!(fields, vec!["center"]);

        let ligands = store.ligands("1abc").unwrap();
        assert_eq!(ligands.len(), 2);
        let atp = ligands.iter().find(|l| l.residue_name == "ATP").unwrap();
        assert_eq!(atp.center, [1.0, 2.0, 3.0]);
        assert_eq!(atp.binding_site, json!({"num_binding_residues": 4}));
        let mg = ligands.iter().find(|l| l.residue_name == "MG").unwrap();
        assert_eq!(mg.center, [0.0, 0.0, 0.0]);
        assert_eq!(mg.binding_site, json!({}));
    }

    #[test]
    fn insertion_code_is_part_of_the_ligand_residue_id() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let inserted = row("1abc").with(
            "enhanced_ligands",
            r#"[{"ligand_id": "52", "residue_name": "NAG", "chain_id": "H"}, {"ligand_id": "52", "insertion_code": "A", "residue_name": "NAG", "chain_id": "H"}]"#,
        );
        import(&mut store, vec![inserted]).unwrap();
        let mut ids: Vec<String> = store
            .ligands("1abc")
            .unwrap()
            .into_iter()
            .map(|l| l.residue_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["52", "52A"]);
    }

    #[test]
    fn falls_back_to_plain_ligands_column() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let plain = row("1abc")
            .with("enhanced_ligands", "")
            .with(
                "ligands",
                "[{'ligand_id': ('H_HEM', 500, ' '), 'residue_name': 'HEM', 'chain_id': 'A', 'num_atoms': 43, 'center': [0.5, 0.5, 0.5]}]",
            );
        import(&mut store, vec![plain]).unwrap();
        let ligands = store.ligands("1abc").unwrap();
        assert_eq!(ligands[0].residue_id, "500");
        assert_eq!(ligands[0].num_atoms, 43);
    }

    #[test]
    fn chain_layout_accepts_list_or_mapping() {
        let from_list = chain_layout(&json!([{"chain_id": "A", "length": 10, "residue_range": "1-10"}]));
        let from_map = chain_layout(&json!({"A": {"length": 10, "residue_range": "1-10"}}));
        assert_eq!(from_list, from_map);
        assert!(chain_layout(&json!([{"length": 3}])).is_none());
        assert!(chain_layout(&json!("A")).is_none());
    }

    #[test]
    fn binding_metrics_lookup_order() {
        let metrics = json!({
            "ATP": {"Kd": 1},
            "A:ATP": {"Kd": 3},
            "ligand_binding": {"A_301": {"Kd": 2}, "HEM": {"Ki": 9}}
        });
        assert_eq!(ligand_binding_metrics(&metrics, "A", "301", "ATP"), json!({"Kd": 2}));
        assert_eq!(ligand_binding_metrics(&metrics, "B", "1", "ATP"), json!({"Kd": 1}));
        assert_eq!(ligand_binding_metrics(&metrics, "A", "7", "HEM"), json!({"Ki": 9}));
        assert_eq!(ligand_binding_metrics(&metrics, "C", "1", "NAG"), json!({}));

        let empty_first = json!({"A_301": {}, "ATP": {"Kd": 1}});
        assert_eq!(ligand_binding_metrics(&empty_first, "A", "301", "ATP"), json!({}));
    }

    #[test]
    fn checkpoint_interval_is_configurable() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let config = ImportConfigBuilder::new().checkpoint_interval(2).build().unwrap();
        let table = Table {
            headers: Vec::new(),
            rows: (0..5).map(|i| row(&format!("{i}abc"))).collect(),
        };
        let checkpoints = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Checkpoint { committed_rows } = event {
                checkpoints.lock().unwrap().push(committed_rows);
            }
        }));
        Importer::new(&mut store, config)
            .import_table(&table, &reporter)
            .unwrap();
        drop(reporter);
        assert_eq!(checkpoints.into_inner().unwrap(), vec![2, 4]);
        assert_eq!(store.stats().unwrap().protein_count, 5);
    }
}
