use super::descriptors::Descriptors;
use super::qed::qed;
use super::toolkit::{ChemError, MoleculeToolkit, SmilesToolkit};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// QED score a ligand must exceed to be called druglike.
pub const DRUGLIKE_QED_THRESHOLD: f64 = 0.5;
/// Maximum number of Lipinski violations a druglike ligand may have.
pub const DRUGLIKE_MAX_VIOLATIONS: u32 = 1;

/// Descriptor set attached to a ligand, serialized with the keys used in the
/// enhancement artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigandProperties {
    pub molecular_weight: f64,
    pub logp: f64,
    pub h_donors: u32,
    pub h_acceptors: u32,
    pub rotatable_bonds: u32,
    pub rings: u32,
    pub tpsa: f64,
    pub qed: f64,
    pub lipinski_violations: u32,
    pub is_druglike: bool,
}

/// Number of Lipinski rule-of-five criteria the descriptors break.
pub fn lipinski_violations(d: &Descriptors) -> u32 {
    [
        d.molecular_weight > 500.0,
        d.h_donors > 5,
        d.h_acceptors > 10,
        d.logp > 5.0,
    ]
    .into_iter()
    .map(u32::from)
    .sum()
}

impl LigandProperties {
    pub fn assess(descriptors: &Descriptors, qed: f64) -> Self {
        let lipinski_violations = lipinski_violations(descriptors);
        Self {
            molecular_weight: descriptors.molecular_weight,
            logp: descriptors.logp,
            h_donors: descriptors.h_donors,
            h_acceptors: descriptors.h_acceptors,
            rotatable_bonds: descriptors.rotatable_bonds,
            rings: descriptors.rings,
            tpsa: descriptors.tpsa,
            qed,
            lipinski_violations,
            is_druglike: qed > DRUGLIKE_QED_THRESHOLD
                && lipinski_violations <= DRUGLIKE_MAX_VIOLATIONS,
        }
    }
}

/// Computes [`LigandProperties`] through a [`MoleculeToolkit`].
#[derive(Debug, Clone, Default)]
pub struct PropertyCalculator<T = SmilesToolkit> {
    toolkit: T,
}

impl PropertyCalculator<SmilesToolkit> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: MoleculeToolkit> PropertyCalculator<T> {
    pub fn with_toolkit(toolkit: T) -> Self {
        Self { toolkit }
    }

    pub fn compute(&self, smiles: &str) -> Result<LigandProperties, ChemError> {
        let descriptors = self.toolkit.descriptors(smiles)?;
        let properties = LigandProperties::assess(&descriptors, qed(&descriptors));
        debug!(
            toolkit = self.toolkit.name(),
            smiles,
            qed = properties.qed,
            "Computed ligand properties"
        );
        Ok(properties)
    }
}
