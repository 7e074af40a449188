use super::ids::{AtomId, ChainId};
use crate::core::utils::identifiers::is_water_residue;
use std::collections::HashMap;

/// Classification of a residue by the record type it was read from.
///
/// `Standard` residues come from `ATOM` records and form the polymer;
/// `Hetero` residues come from `HETATM` records (ligands, ions, modified
/// residues); `Water` residues are solvent hetero-groups and never count as
/// ligands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResidueKind {
    #[default]
    Standard,
    Hetero,
    Water,
}

impl ResidueKind {
    /// Classifies a residue from its record type and residue name.
    pub fn classify(is_hetatm: bool, residue_name: &str) -> Self {
        if is_water_residue(residue_name) {
            ResidueKind::Water
        } else if is_hetatm {
            ResidueKind::Hetero
        } else {
            ResidueKind::Standard
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub residue_number: isize,              // Residue sequence number from source file
    pub insertion_code: Option<char>,       // Insertion code (column 27), if any
    pub name: String,                       // Name of the residue (e.g., "ALA", "ATP")
    pub kind: ResidueKind,                  // Record classification
    pub chain_id: ChainId,                  // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,          // Atoms in file order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its stable ID
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        kind: ResidueKind,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            insertion_code,
            name: name.to_string(),
            kind,
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map.insert(atom_name.to_string(), atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }

    /// Whether this residue belongs to the standard polymer (an `ATOM` record).
    pub fn is_standard(&self) -> bool {
        self.kind == ResidueKind::Standard
    }

    /// Whether this residue is a non-water hetero-group, i.e. a ligand.
    pub fn is_ligand(&self) -> bool {
        self.kind == ResidueKind::Hetero
    }
}
