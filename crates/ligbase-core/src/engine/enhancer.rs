use super::binding_site::{BindingSiteExtractor, LigandRef};
use super::config::EnhanceConfig;
use super::error::EnhanceError;
use super::tabular::{Table, base_record_from_row};
use crate::core::chem::properties::PropertyCalculator;
use crate::core::classify::family::FamilyTaxonomy;
use crate::core::classify::quality::QualityTier;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::MolecularFile;
use crate::core::models::system::MolecularSystem;
use crate::core::parsing::FieldParser;
use crate::core::records::{
    BaseRecord, BindingMetrics, BindingSiteInfo, EnhancedLigand, EnrichedRecord,
    ExperimentalConditions, LigandEntry, MetricValue,
};
use crate::core::utils::identifiers::normalize_pdb_id;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// One measured binding value from the metadata source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BindingDatum {
    #[serde(default)]
    pub comp_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Per-structure metadata used for enrichment. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StructureMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_keywords")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub resolution: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub r_free: Option<f64>,
    #[serde(default)]
    pub experimental_method: Option<String>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub binding_data: Option<Vec<BindingDatum>>,
    #[serde(default)]
    pub related_structures: Option<Vec<Value>>,
    /// SMILES by ligand residue name.
    #[serde(default)]
    pub ligand_smiles: BTreeMap<String, String>,
}

/// Metadata keyed by upper-case structure id.
pub type MetadataIndex = BTreeMap<String, StructureMetadata>;

/// Keywords arrive either as a list or as one comma-separated string.
fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keywords = match Value::deserialize(deserializer)? {
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(keywords)
}

/// Accepts a number, a numeric string, or a list whose first element is one.
fn deserialize_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number_from_value(&Value::deserialize(deserializer)?))
}

pub(crate) fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Array(items) => items.first().and_then(number_from_value),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

/// Reads a metadata file: a JSON object keyed by structure id.
pub fn load_metadata(path: &Path) -> Result<MetadataIndex, EnhanceError> {
    let content = std::fs::read_to_string(path).map_err(|source| EnhanceError::MetadataIo {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: BTreeMap<String, StructureMetadata> =
        serde_json::from_str(&content).map_err(|source| EnhanceError::MetadataFormat {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(raw
        .into_iter()
        .map(|(id, metadata)| (normalize_pdb_id(&id), metadata))
        .collect())
}

/// Enriches base records with annotations, pockets and ligand properties.
pub struct Enhancer<'t> {
    config: EnhanceConfig,
    taxonomy: &'t FamilyTaxonomy,
    extractor: BindingSiteExtractor,
    calculator: PropertyCalculator,
    base_records: HashMap<String, BaseRecord>,
}

impl<'t> Enhancer<'t> {
    /// Creates an enhancer over the base table named in `config`.
    pub fn new(config: EnhanceConfig, taxonomy: &'t FamilyTaxonomy) -> Result<Self, EnhanceError> {
        let table = Table::read(&config.base_table_path)?;
        table.require_column("pdb_id", &config.base_table_path)?;
        let parser = FieldParser::default();
        let records = table
            .rows
            .iter()
            .map(|row| base_record_from_row(row, &parser))
            .collect();
        Ok(Self::with_records(config, taxonomy, records))
    }

    /// Creates an enhancer over records already in memory. The first record
    /// wins when an id repeats.
    pub fn with_records(
        config: EnhanceConfig,
        taxonomy: &'t FamilyTaxonomy,
        records: Vec<BaseRecord>,
    ) -> Self {
        let mut base_records = HashMap::with_capacity(records.len());
        for record in records {
            base_records
                .entry(normalize_pdb_id(&record.pdb_id))
                .or_insert(record);
        }
        Self {
            extractor: BindingSiteExtractor::new(config.contact_cutoff),
            config,
            taxonomy,
            calculator: PropertyCalculator::new(),
            base_records,
        }
    }

    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    pub fn base_record(&self, pdb_id: &str) -> Option<&BaseRecord> {
        self.base_records.get(&normalize_pdb_id(pdb_id))
    }

    pub fn enhance(
        &self,
        pdb_id: &str,
        metadata: &StructureMetadata,
    ) -> Result<EnrichedRecord, EnhanceError> {
        let Some(base) = self.base_record(pdb_id) else {
            error!(pdb_id, "Structure not found in processed data");
            return Err(EnhanceError::BaseRecordNotFound {
                pdb_id: pdb_id.to_string(),
            });
        };

        let title = metadata.title.clone().unwrap_or_default();
        let protein_families = self
            .taxonomy
            .classify(&title, metadata.keywords.as_slice())
            .into_iter()
            .collect();

        let enhanced_ligands = self
            .structure_path(&base.pdb_id)
            .and_then(|path| self.load_structure(&path, &base.pdb_id))
            .map(|system| {
                base.ligands
                    .iter()
                    .map(|ligand| self.enhance_ligand(&system, ligand, metadata))
                    .collect()
            });

        Ok(EnrichedRecord {
            base: base.clone(),
            title,
            protein_families,
            experimental_quality: QualityTier::classify(metadata.resolution, metadata.r_free),
            experimental_conditions: ExperimentalConditions {
                method: metadata.experimental_method.clone(),
                temperature: metadata.temperature,
                resolution: metadata.resolution,
            },
            binding_metrics: metadata.binding_data.as_deref().map(fold_binding_data),
            related_structures: metadata.related_structures.clone(),
            enhanced_ligands,
        })
    }

    /// `<structure_dir>/<id>.pdb`, trying the lower-case then upper-case id.
    fn structure_path(&self, pdb_id: &str) -> Option<PathBuf> {
        [pdb_id.to_ascii_lowercase(), pdb_id.to_ascii_uppercase()]
            .into_iter()
            .map(|id| self.config.structure_dir.join(format!("{id}.pdb")))
            .find(|path| path.is_file())
    }

    fn load_structure(&self, path: &Path, pdb_id: &str) -> Option<MolecularSystem> {
        match PdbFile::read_from_path(path) {
            Ok((system, _)) => Some(system),
            Err(e) => {
                warn!(pdb_id, path = %path.display(), error = %e, "Structure file unreadable; skipping binding sites");
                None
            }
        }
    }

    fn enhance_ligand(
        &self,
        system: &MolecularSystem,
        ligand: &LigandEntry,
        metadata: &StructureMetadata,
    ) -> EnhancedLigand {
        let binding_site = match ligand.residue_number() {
            Some(residue_number) => self.extractor.extract(
                system,
                LigandRef {
                    chain_id: &ligand.chain_id,
                    residue_number,
                    insertion_code: ligand.insertion_code,
                },
            ),
            None => {
                warn!(ligand_id = %ligand.ligand_id, "Non-numeric ligand id; reporting an empty binding site");
                BindingSiteInfo::empty()
            }
        };

        let mut ligand = ligand.clone();
        if ligand.smiles.is_none() {
            ligand.smiles = metadata.ligand_smiles.get(&ligand.residue_name).cloned();
        }
        let properties = ligand.smiles.as_deref().and_then(|smiles| {
            match self.calculator.compute(smiles) {
                Ok(properties) => Some(properties),
                Err(e) => {
                    warn!(residue_name = %ligand.residue_name, error = %e, "Ligand properties unavailable");
                    None
                }
            }
        });

        debug!(
            residue_name = %ligand.residue_name,
            contacts = binding_site.num_binding_residues,
            "Enhanced ligand"
        );
        EnhancedLigand {
            ligand,
            binding_site,
            properties,
        }
    }
}

/// Folds a flat list of measurements into `comp_id -> type -> {value, unit}`.
/// Entries without a compound id or type are dropped.
pub fn fold_binding_data(data: &[BindingDatum]) -> BindingMetrics {
    let mut metrics = BindingMetrics::new();
    for datum in data {
        let (Some(comp_id), Some(kind)) = (&datum.comp_id, &datum.kind) else {
            warn!(?datum, "Binding datum lacks a compound id or type");
            continue;
        };
        metrics.entry(comp_id.clone()).or_default().insert(
            kind.clone(),
            MetricValue {
                value: datum.value.clone(),
                unit: datum.unit.clone(),
            },
        );
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::records::{ChainEntry, StructureStatus};
    use crate::engine::config::EnhanceConfigBuilder;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{TempDir, tempdir};

    const PDB: &str = "\
ATOM      1  N   SER A  10       4.000   0.000   0.000  1.00 20.00           N
ATOM      2  OG  SER A  10       1.000   0.000   0.000  1.00 20.00           O
ATOM      3  CB  ALA A  11      20.000   0.000   0.000  1.00 20.00           C
HETATM    4  PG  ATP A 301       0.000   0.000   0.000  1.00 20.00           P
END
";

    fn base() -> BaseRecord {
        BaseRecord {
            pdb_id: "1abc".into(),
            status: StructureStatus::Processed,
            num_models: 1,
            chains: vec![ChainEntry {
                chain_id: "A".into(),
                length: 2,
                residue_range: "10-11".into(),
            }],
            ligands: vec![LigandEntry {
                ligand_id: "301".into(),
                insertion_code: None,
                residue_name: "ATP".into(),
                chain_id: "A".into(),
                num_atoms: 1,
                center: Some([0.0, 0.0, 0.0]),
                smiles: None,
            }],
        }
    }

    fn setup(with_structure: bool) -> (TempDir, EnhanceConfig) {
        let dir = tempdir().unwrap();
        if with_structure {
            let mut file = std::fs::File::create(dir.path().join("1ABC.pdb")).unwrap();
            file.write_all(PDB.as_bytes()).unwrap();
        }
        let config = EnhanceConfigBuilder::new().work_dir(dir.path()).build().unwrap();
        (dir, config)
    }

    fn metadata() -> StructureMetadata {
        serde_json::from_value(json!({
            "title": "Tyrosine kinase domain",
            "keywords": "TRANSFERASE, ATP-BINDING",
            "resolution": [1.2],
            "r_free": 0.18,
            "experimental_method": "X-RAY DIFFRACTION",
            "temperature": "100",
            "binding_data": [
                {"comp_id": "ATP", "type": "Kd", "value": 12.5, "unit": "nM"},
                {"comp_id": "ATP", "type": "IC50", "value": 40, "unit": "nM"},
                {"type": "Ki", "value": 1}
            ],
            "related_structures": [{"pdb_id": "2ABC"}],
            "ligand_smiles": {"ATP": "CC(=O)Oc1ccccc1C(=O)O"}
        }))
        .unwrap()
    }

    #[test]
    fn metadata_accepts_loose_shapes() {
        let m = metadata();
        assert_eq!(m.keywords, vec!["TRANSFERASE", "ATP-BINDING"]);
        assert_eq!(m.resolution, Some(1.2));
        assert_eq!(m.temperature, Some(100.0));

        let empty: StructureMetadata = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, StructureMetadata::default());
    }

    #[test]
    fn enhance_sets_annotations_and_pockets() {
        let (_dir, config) = setup(true);
        let taxonomy = FamilyTaxonomy::default();
        let enhancer = Enhancer::with_records(config, &taxonomy, vec![base()]);

        let record = enhancer.enhance("1ABC", &metadata()).unwrap();
        assert_eq!(record.title, "Tyrosine kinase domain");
        assert_eq!(record.protein_families, vec!["kinase"]);
        assert_eq!(record.experimental_quality, QualityTier::HighQuality);
        assert_eq!(
            record.experimental_conditions.method.as_deref(),
            Some("X-RAY DIFFRACTION")
        );

        let metrics = record.binding_metrics.unwrap();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics["ATP"]["Kd"].value, json!(12.5));
        assert_eq!(metrics["ATP"]["IC50"].unit.as_deref(), Some("nM"));
        assert_eq!(record.related_structures.unwrap().len(), 1);

        let ligands = record.enhanced_ligands.unwrap();
        assert_eq!(ligands.len(), 1);
        let site = &ligands[0].binding_site;
        assert_eq!(site.num_binding_residues, 1);
        assert_eq!(site.binding_residues[0].residue_name, "SER");
        assert_eq!(site.binding_residues[0].distance, 4.0);
        assert_eq!(site.pocket_polarity, 1.0);

        let props = ligands[0].properties.as_ref().unwrap();
        assert!((props.molecular_weight - 180.159).abs() < 0.01);
        assert_eq!(ligands[0].ligand.smiles.as_deref(), Some("CC(=O)Oc1ccccc1C(=O)O"));
    }

    #[test]
    fn missing_structure_file_leaves_ligands_unenhanced() {
        let (_dir, config) = setup(false);
        let taxonomy = FamilyTaxonomy::default();
        let enhancer = Enhancer::with_records(config, &taxonomy, vec![base()]);

        let record = enhancer.enhance("1abc", &StructureMetadata::default()).unwrap();
        assert!(record.enhanced_ligands.is_none());
        assert!(record.binding_metrics.is_none());
        assert!(record.protein_families.is_empty());
        assert_eq!(record.experimental_quality, QualityTier::UnknownQuality);
    }

    #[test]
    fn invalid_smiles_keeps_ligand_without_properties() {
        let (_dir, config) = setup(true);
        let taxonomy = FamilyTaxonomy::default();
        let enhancer = Enhancer::with_records(config, &taxonomy, vec![base()]);
        let mut meta = StructureMetadata::default();
        meta.ligand_smiles.insert("ATP".into(), "C1CC(".into());

        let record = enhancer.enhance("1abc", &meta).unwrap();
        let ligand = &record.enhanced_ligands.unwrap()[0];
        assert!(ligand.properties.is_none());
        assert_eq!(ligand.binding_site.num_binding_residues, 1);
    }

    #[test]
    fn unknown_structure_is_an_error() {
        let (_dir, config) = setup(false);
        let taxonomy = FamilyTaxonomy::default();
        let enhancer = Enhancer::with_records(config, &taxonomy, vec![base()]);
        assert!(matches!(
            enhancer.enhance("9zzz", &StructureMetadata::default()),
            Err(EnhanceError::BaseRecordNotFound { .. })
        ));
    }

    #[test]
    fn new_loads_base_table_from_disk() {
        let (dir, config) = setup(false);
        crate::engine::tabular::processed_table(&[base()])
            .unwrap()
            .write(&config.base_table_path)
            .unwrap();
        let taxonomy = FamilyTaxonomy::default();
        let enhancer = Enhancer::new(config, &taxonomy).unwrap();
        assert_eq!(enhancer.base_record("1ABC"), Some(&base()));
        drop(dir);
    }

    #[test]
    fn load_metadata_normalizes_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(&path, r#"{"1abc": {"title": "x"}, "2DEF": {}}"#).unwrap();
        let index = load_metadata(&path).unwrap();
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["1ABC", "2DEF"]);

        std::fs::write(&path, "[1, 2]").unwrap();
        assert!(matches!(
            load_metadata(&path),
            Err(EnhanceError::MetadataFormat { .. })
        ));
    }
}
