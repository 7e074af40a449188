use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::system::MolecularSystem;
use crate::core::records::{BindingResidue, BindingSiteInfo};
use crate::core::utils::identifiers::is_polar_residue;
use std::path::Path;
use tracing::warn;

/// Heavy-atom distance (Å) below which a residue counts as a pocket contact.
pub const DEFAULT_CONTACT_CUTOFF: f64 = 5.0;

/// Identifies a ligand residue by chain, sequence number and insertion code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LigandRef<'a> {
    pub chain_id: &'a str,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
}

impl LigandRef<'_> {
    fn chain_char(&self) -> char {
        self.chain_id.chars().next().unwrap_or(' ')
    }
}

/// Geometric pocket detection around a ligand residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindingSiteExtractor {
    cutoff: f64,
}

impl Default for BindingSiteExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_CONTACT_CUTOFF)
    }
}

impl BindingSiteExtractor {
    pub fn new(cutoff: f64) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Finds the standard residues in contact with a ligand.
    ///
    /// Residues are visited chain by chain in file order. For each residue the
    /// scan walks its atoms against the ligand atoms and records the distance of
    /// the first pair closer than the cutoff, which is not necessarily the
    /// closest pair. A ligand that cannot be located yields an empty result.
    pub fn extract(&self, system: &MolecularSystem, ligand: LigandRef<'_>) -> BindingSiteInfo {
        let ligand_atoms: Vec<&Atom> = match system
            .find_chain_by_id(ligand.chain_char())
            .and_then(|chain| {
                system.find_residue_by_id(chain, ligand.residue_number, ligand.insertion_code)
            })
        {
            Some(residue_id) => system.residue_atoms(residue_id).collect(),
            None => {
                warn!(
                    chain_id = ligand.chain_id,
                    residue_id = ligand.residue_number,
                    "Ligand residue not found; reporting an empty binding site"
                );
                return BindingSiteInfo::empty();
            }
        };

        let mut contacts = Vec::new();
        for (_, chain) in system.chains() {
            for &residue_id in chain.residues() {
                let Some(residue) = system.residue(residue_id) else {
                    continue;
                };
                if !residue.is_standard() {
                    continue;
                }
                let first_contact = system.residue_atoms(residue_id).find_map(|atom| {
                    ligand_atoms
                        .iter()
                        .map(|ligand_atom| atom.distance_to(ligand_atom))
                        .find(|&d| d < self.cutoff)
                });
                if let Some(distance) = first_contact {
                    contacts.push(BindingResidue {
                        chain_id: chain.id.to_string(),
                        residue_id: residue.residue_number,
                        insertion_code: residue.insertion_code,
                        residue_name: residue.name.clone(),
                        distance,
                    });
                }
            }
        }

        summarize(contacts)
    }

    /// Parses a structure file and extracts the pocket of one ligand.
    ///
    /// Unreadable files yield an empty result and a warning.
    pub fn extract_from_file(&self, path: &Path, ligand: LigandRef<'_>) -> BindingSiteInfo {
        match PdbFile::read_from_path(path) {
            Ok((system, _)) => self.extract(&system, ligand),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not parse structure for binding-site extraction");
                BindingSiteInfo::empty()
            }
        }
    }
}

fn summarize(contacts: Vec<BindingResidue>) -> BindingSiteInfo {
    if contacts.is_empty() {
        return BindingSiteInfo::empty();
    }
    let count = contacts.len();
    let avg_distance = contacts.iter().map(|c| c.distance).sum::<f64>() / count as f64;
    let polar = contacts
        .iter()
        .filter(|c| is_polar_residue(&c.residue_name))
        .count();

    BindingSiteInfo {
        num_binding_residues: count,
        avg_distance: Some(avg_distance),
        pocket_polarity: polar as f64 / count as f64,
        binding_residues: contacts,
    }
}
