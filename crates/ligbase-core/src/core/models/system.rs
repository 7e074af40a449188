use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{Residue, ResidueKind};
use slotmap::SlotMap;
use std::collections::HashMap;

/// Represents one parsed model of a deposited structure.
///
/// This struct is the geometry adapter the rest of the pipeline talks to:
/// chains, residues and atoms are stored in slot maps with stable IDs, and
/// chains are additionally kept in file order so that every scan over the
/// structure visits chains, residues and atoms in the order they were read.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    atoms: SlotMap<AtomId, Atom>,
    residues: SlotMap<ResidueId, Residue>,
    chains: SlotMap<ChainId, Chain>,
    /// First-seen order; slot map iteration order is not stable.
    chain_order: Vec<ChainId>,
    residue_index: HashMap<(ChainId, isize, Option<char>), ResidueId>,
    chain_index: HashMap<char, ChainId>,
}

impl MolecularSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Chains in source order, first-seen chain first.
    pub fn chains(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(|&id| self.chains.get(id).map(|chain| (id, chain)))
    }

    /// Returns the atoms of a residue in source order.
    ///
    /// Unknown residue IDs yield an empty iterator.
    pub fn residue_atoms(&self, residue_id: ResidueId) -> impl Iterator<Item = &Atom> {
        self.residues
            .get(residue_id)
            .map(|r| r.atoms.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(|&atom_id| self.atoms.get(atom_id))
    }

    /// Returns every non-water hetero residue, chain by chain in source order.
    pub fn ligand_residues(&self) -> Vec<(ResidueId, &Residue)> {
        self.chains()
            .flat_map(|(_, chain)| chain.residues.iter())
            .filter_map(|&id| self.residues.get(id).map(|r| (id, r)))
            .filter(|(_, r)| r.is_ligand())
            .collect()
    }

    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_index.get(&id).copied()
    }

    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        self.residue_index
            .get(&(chain_id, residue_number, insertion_code))
            .copied()
    }

    /// Returns the chain with this identifier, creating it at the end of the
    /// chain order if it is new.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        if let Some(&existing) = self.chain_index.get(&id) {
            return existing;
        }
        let chain_id = self.chains.insert(Chain::new(id));
        self.chain_index.insert(id, chain_id);
        self.chain_order.push(chain_id);
        chain_id
    }

    /// Returns the residue keyed by `(chain_id, residue_number, insertion_code)`, creating it
    /// if needed. The name and kind of an existing residue are left alone.
    ///
    /// `None` if the chain does not exist.
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        kind: ResidueKind,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number, insertion_code);

        let residue_id = *self.residue_index.entry(key).or_insert_with(|| {
            let residue = Residue::new(residue_number, insertion_code, name, kind, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// `None` if the residue does not exist.
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.residues.get_mut(residue_id)?.add_atom(&name, atom_id);

        Some(atom_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn create_test_system() -> MolecularSystem {
        let mut system = MolecularSystem::new();
        let chain_b = system.add_chain('B');
        let chain_a = system.add_chain('A');

        let ser = system
            .add_residue(chain_b, 10, None, "SER", ResidueKind::Standard)
            .unwrap();
        system
            .add_atom_to_residue(ser, Atom::new("OG", ser, Point3::new(1.0, 0.0, 0.0)))
            .unwrap();

        let atp = system
            .add_residue(chain_a, 301, None, "ATP", ResidueKind::Hetero)
            .unwrap();
        system
            .add_atom_to_residue(atp, Atom::new("PG", atp, Point3::origin()))
            .unwrap();
        system
            .add_atom_to_residue(atp, Atom::new("O1G", atp, Point3::new(0.0, 1.5, 0.0)))
            .unwrap();

        let hoh = system
            .add_residue(chain_a, 401, None, "HOH", ResidueKind::Water)
            .unwrap();
        system
            .add_atom_to_residue(hoh, Atom::new("O", hoh, Point3::new(9.0, 9.0, 9.0)))
            .unwrap();
        system
    }

    #[test]
    fn chains_are_iterated_in_insertion_order() {
        let system = create_test_system();
        let ids: Vec<char> = system.chains().map(|(_, c)| c.id).collect();
        assert_eq!(ids, vec!['B', 'A']);
    }

    #[test]
    fn add_chain_and_add_residue_are_idempotent() {
        let mut system = create_test_system();
        let chain_a = system.find_chain_by_id('A').unwrap();
        assert_eq!(system.add_chain('A'), chain_a);

        let existing = system.find_residue_by_id(chain_a, 301, None).unwrap();
        let again = system
            .add_residue(chain_a, 301, None, "ATP", ResidueKind::Hetero)
            .unwrap();
        assert_eq!(existing, again);
        assert_eq!(system.chain(chain_a).unwrap().residues().len(), 2);
    }

    #[test]
    fn insertion_codes_key_distinct_residues() {
        let mut system = create_test_system();
        let chain_b = system.find_chain_by_id('B').unwrap();
        let inserted = system
            .add_residue(chain_b, 10, Some('A'), "ALA", ResidueKind::Standard)
            .unwrap();
        let plain = system.find_residue_by_id(chain_b, 10, None).unwrap();
        assert_ne!(inserted, plain);
        assert_eq!(system.find_residue_by_id(chain_b, 10, Some('A')), Some(inserted));
        assert_eq!(system.residue(inserted).unwrap().insertion_code, Some('A'));
        assert_eq!(system.chain(chain_b).unwrap().residues(), &[plain, inserted]);
    }

    #[test]
    fn residue_atoms_returns_atoms_in_source_order() {
        let system = create_test_system();
        let chain_a = system.find_chain_by_id('A').unwrap();
        let atp = system.find_residue_by_id(chain_a, 301, None).unwrap();
        let names: Vec<&str> = system.residue_atoms(atp).map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["PG", "O1G"]);
    }

    #[test]
    fn ligand_residues_excludes_water_and_polymer() {
        let system = create_test_system();
        let ligands = system.ligand_residues();
        assert_eq!(ligands.len(), 1);
        assert_eq!(ligands[0].1.name, "ATP");
    }

    #[test]
    fn lookups_fail_gracefully_for_unknown_ids() {
        let system = create_test_system();
        assert!(system.find_chain_by_id('Z').is_none());
        let chain_a = system.find_chain_by_id('A').unwrap();
        assert!(system.find_residue_by_id(chain_a, 999, None).is_none());
    }

    #[test]
    fn add_atom_to_missing_residue_returns_none() {
        let mut system = MolecularSystem::new();
        let orphan = ResidueId::default();
        assert!(
            system
                .add_atom_to_residue(orphan, Atom::new("C", orphan, Point3::origin()))
                .is_none()
        );
        assert!(system.atoms.is_empty());
    }
}
