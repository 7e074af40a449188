use super::atom::Atom;
use super::ids::{AtomId, ResidueId};
use super::residue::ResidueKind;
use super::system::MolecularSystem;
use nalgebra::Point3;

/// Incrementally assembles a [`MolecularSystem`] from a stream of atom records.
///
/// Readers call [`start_residue`](Self::start_residue) whenever the residue key
/// changes and [`add_atom`](Self::add_atom) for every atom line.
#[derive(Debug, Default)]
pub struct MolecularSystemBuilder {
    system: MolecularSystem,
    current_residue: Option<ResidueId>,
}

impl MolecularSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `(chain_id, residue_number, insertion_code)` the current residue,
    /// creating the chain and residue on first sight.
    pub fn start_residue(
        &mut self,
        chain_id: char,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        kind: ResidueKind,
    ) -> &mut Self {
        let chain = self.system.add_chain(chain_id);
        self.current_residue =
            self.system
                .add_residue(chain, residue_number, insertion_code, name, kind);
        self
    }

    /// Appends an atom to the current residue.
    ///
    /// Returns `None` when no residue has been started or when the residue
    /// already holds an atom with the same name (alternate conformers).
    pub fn add_atom(
        &mut self,
        serial: usize,
        name: &str,
        element: &str,
        position: Point3<f64>,
    ) -> Option<AtomId> {
        let residue_id = self.current_residue?;
        if self
            .system
            .residue(residue_id)?
            .get_atom_id_by_name(name)
            .is_some()
        {
            return None;
        }

        let mut atom = Atom::new(name, residue_id, position);
        atom.serial = serial;
        atom.element = element.to_ascii_uppercase();
        self.system.add_atom_to_residue(residue_id, atom)
    }

    pub fn build(self) -> MolecularSystem {
        self.system
    }
}
