//! Record types shared by the processing, enhancement and import stages.
//!
//! The serde field names match the columns and nested keys of the tabular
//! artifacts (`processed_structures.csv`, `enhanced_structures.csv`).

use crate::core::chem::properties::LigandProperties;
use crate::core::classify::quality::QualityTier;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle state of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureStatus {
    #[default]
    Pending,
    Processed,
    Failed,
}

impl StructureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureStatus::Pending => "pending",
            StructureStatus::Processed => "processed",
            StructureStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for StructureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Invalid structure status: '{0}'")]
pub struct ParseStatusError(String);

impl FromStr for StructureStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(StructureStatus::Pending),
            "processed" => Ok(StructureStatus::Processed),
            "failed" => Ok(StructureStatus::Failed),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// One protein chain in a base record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    pub chain_id: String,
    pub length: usize,
    pub residue_range: String,
}

/// Chain layout as stored: chain id to length and residue range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSummary {
    pub length: usize,
    pub residue_range: String,
}

pub type ChainLayout = BTreeMap<String, ChainSummary>;

/// One contact residue of a binding site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingResidue {
    pub chain_id: String,
    pub residue_id: isize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion_code: Option<char>,
    pub residue_name: String,
    pub distance: f64,
}

/// Pocket description attached to a ligand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BindingSiteInfo {
    pub binding_residues: Vec<BindingResidue>,
    pub num_binding_residues: usize,
    pub avg_distance: Option<f64>,
    pub pocket_polarity: f64,
}

impl BindingSiteInfo {
    /// The result reported when no pocket could be determined.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.binding_residues.is_empty()
    }
}

/// Renders a ligand identifier from the shapes it is found in upstream:
/// a plain number, a string, or a `(hetero flag, sequence number, insertion code)`
/// tuple from which the sequence number is taken.
pub fn ligand_id_from_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .find(|v| v.is_number())
            .or_else(|| items.first())
            .map(ligand_id_from_value)
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn deserialize_ligand_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(ligand_id_from_value(&value))
}

/// A ligand as found in the structure file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigandEntry {
    #[serde(alias = "residue_id", deserialize_with = "deserialize_ligand_id")]
    pub ligand_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insertion_code: Option<char>,
    pub residue_name: String,
    pub chain_id: String,
    #[serde(default)]
    pub num_atoms: usize,
    #[serde(default)]
    pub center: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smiles: Option<String>,
}

impl LigandEntry {
    /// Residue sequence number, when the identifier is numeric.
    pub fn residue_number(&self) -> Option<isize> {
        self.ligand_id.parse().ok()
    }
}

/// A base ligand plus its pocket and, when a SMILES is known, its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedLigand {
    #[serde(flatten)]
    pub ligand: LigandEntry,
    pub binding_site: BindingSiteInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<LigandProperties>,
}

/// One measured binding value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub value: Value,
    pub unit: Option<String>,
}

/// Binding metrics keyed by compound id, then metric type.
pub type BindingMetrics = BTreeMap<String, BTreeMap<String, MetricValue>>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExperimentalConditions {
    pub method: Option<String>,
    pub temperature: Option<f64>,
    pub resolution: Option<f64>,
}

/// Output of structure processing: one row of `processed_structures.csv`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BaseRecord {
    pub pdb_id: String,
    pub status: StructureStatus,
    pub num_models: usize,
    pub chains: Vec<ChainEntry>,
    pub ligands: Vec<LigandEntry>,
}

impl BaseRecord {
    pub fn failed(pdb_id: &str) -> Self {
        Self {
            pdb_id: pdb_id.to_string(),
            status: StructureStatus::Failed,
            ..Default::default()
        }
    }

    pub fn num_chains(&self) -> usize {
        self.chains.len()
    }

    pub fn num_ligands(&self) -> usize {
        self.ligands.len()
    }
}

/// One row of `enhanced_structures.csv`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnrichedRecord {
    pub base: BaseRecord,
    pub title: String,
    pub protein_families: Vec<String>,
    pub experimental_quality: QualityTier,
    pub experimental_conditions: ExperimentalConditions,
    pub binding_metrics: Option<BindingMetrics>,
    pub related_structures: Option<Vec<Value>>,
    pub enhanced_ligands: Option<Vec<EnhancedLigand>>,
}

/// A persisted structure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructureRecord {
    pub pdb_id: String,
    pub title: String,
    pub description: String,
    pub resolution: Option<f64>,
    pub temperature: Option<f64>,
    pub experiment_method: String,
    pub quality: String,
    pub num_chains: i64,
    pub chains: ChainLayout,
    pub experimental_conditions: Value,
    pub status: StructureStatus,
}

/// A persisted ligand; identity within its structure is
/// `(chain_id, residue_id, residue_name)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LigandRecord {
    pub chain_id: String,
    pub residue_id: String,
    pub residue_name: String,
    pub num_atoms: i64,
    pub center: [f64; 3],
    pub smiles: Option<String>,
    pub properties: Option<LigandProperties>,
    pub binding_site: Value,
    pub binding_metrics: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl CategoryRecord {
    pub fn description_for(name: &str) -> String {
        format!("Protein family: {name}")
    }
}
