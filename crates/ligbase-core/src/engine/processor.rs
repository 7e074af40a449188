use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::MolecularFile;
use crate::core::models::system::MolecularSystem;
use crate::core::records::{BaseRecord, ChainEntry, LigandEntry, StructureStatus};
use nalgebra::{Point3, Vector3};
use std::path::Path;
use tracing::{debug, error};

/// Reduces a coordinate file to its base record: the protein chains and the
/// ligands found in the first model.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureProcessor;

impl StructureProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Processes one file; the structure id is the file stem.
    ///
    /// A file that cannot be read or parsed produces a record with status
    /// `failed` instead of an error.
    pub fn process_file(&self, path: &Path) -> BaseRecord {
        let pdb_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        match PdbFile::read_from_path(path) {
            Ok((system, metadata)) => self.summarize(&pdb_id, &system, metadata.model_count),
            Err(e) => {
                error!(pdb_id = %pdb_id, path = %path.display(), error = %e, "Error processing structure");
                BaseRecord::failed(&pdb_id)
            }
        }
    }

    pub fn summarize(&self, pdb_id: &str, system: &MolecularSystem, num_models: usize) -> BaseRecord {
        let record = BaseRecord {
            pdb_id: pdb_id.to_string(),
            status: StructureStatus::Processed,
            num_models,
            chains: chain_entries(system),
            ligands: ligand_entries(system),
        };
        debug!(
            pdb_id,
            chains = record.num_chains(),
            ligands = record.num_ligands(),
            "Processed structure"
        );
        record
    }
}

/// Chains with at least one standard residue, in file order.
fn chain_entries(system: &MolecularSystem) -> Vec<ChainEntry> {
    system
        .chains()
        .filter_map(|(_, chain)| {
            let numbers: Vec<isize> = chain
                .residues()
                .iter()
                .filter_map(|&id| system.residue(id))
                .filter(|r| r.is_standard())
                .map(|r| r.residue_number)
                .collect();
            let (first, last) = (numbers.first()?, numbers.last()?);
            Some(ChainEntry {
                chain_id: chain.id.to_string(),
                length: numbers.len(),
                residue_range: format!("{first}-{last}"),
            })
        })
        .collect()
}

fn ligand_entries(system: &MolecularSystem) -> Vec<LigandEntry> {
    system
        .ligand_residues()
        .into_iter()
        .map(|(residue_id, residue)| {
            let positions: Vec<Point3<f64>> = system
                .residue_atoms(residue_id)
                .map(|a| a.position)
                .collect();
            let chain_id = system
                .chain(residue.chain_id)
                .map(|c| c.id.to_string())
                .unwrap_or_default();
            LigandEntry {
                ligand_id: residue.residue_number.to_string(),
                insertion_code: residue.insertion_code,
                residue_name: residue.name.clone(),
                chain_id,
                num_atoms: positions.len(),
                center: centroid(&positions).map(|c| [c.x, c.y, c.z]),
                smiles: None,
            }
        })
        .collect()
}

fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::<f64>::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}
