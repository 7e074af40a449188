use super::descriptors::Descriptors;
use super::smiles::Molecule;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChemError {
    #[error("Invalid SMILES string '{input}': {reason}")]
    InvalidSmiles { input: String, reason: String },
}

/// A chemistry backend able to turn a line-notation molecule into descriptors.
///
/// Rejected inputs are reported as [`ChemError::InvalidSmiles`] so callers can
/// tell "no properties" apart from "all-zero properties".
pub trait MoleculeToolkit {
    fn name(&self) -> &str;

    fn descriptors(&self, smiles: &str) -> Result<Descriptors, ChemError>;
}

/// Built-in toolkit backed by the crate's own SMILES reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmilesToolkit;

impl MoleculeToolkit for SmilesToolkit {
    fn name(&self) -> &str {
        "ligbase-smiles"
    }

    fn descriptors(&self, smiles: &str) -> Result<Descriptors, ChemError> {
        let molecule = Molecule::parse(smiles).map_err(|e| ChemError::InvalidSmiles {
            input: smiles.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Descriptors::from_molecule(&molecule))
    }
}
