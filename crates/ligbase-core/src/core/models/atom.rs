use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents a single atom read from a deposited structure.
///
/// Only the information needed for geometric queries is kept: the atom's
/// identity within its residue and its Cartesian position. Chemistry-level
/// properties live in the ligand toolkit, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "O1").
    pub name: String,
    /// The element symbol, upper-cased (may be empty if the file omits it).
    pub element: String,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` with no element information.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            serial: 0,
            name: name.to_string(),
            element: String::new(),
            residue_id,
            position,
        }
    }

    /// Euclidean distance to another atom in Angstroms.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let residue_id = ResidueId::default();
        let atom = Atom::new("CA", residue_id, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_id, residue_id);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.serial, 0);
        assert!(atom.element.is_empty());
    }

    #[test]
    fn distance_to_is_euclidean() {
        let residue_id = ResidueId::default();
        let a = Atom::new("C1", residue_id, Point3::new(0.0, 0.0, 0.0));
        let b = Atom::new("C2", residue_id, Point3::new(3.0, 4.0, 0.0));
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert_eq!(a.distance_to(&b), b.distance_to(&a));
    }
}
