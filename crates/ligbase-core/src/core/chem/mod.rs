//! Ligand chemistry: SMILES reading, descriptor calculation and druglikeness.
//!
//! - [`smiles`] - Molecular graph reader for SMILES strings
//! - [`descriptors`] - Weight, logP, donors/acceptors, rotors, rings and TPSA
//! - [`qed`] - Quantitative estimate of druglikeness
//! - [`toolkit`] - The [`toolkit::MoleculeToolkit`] seam and its built-in implementation
//! - [`properties`] - [`properties::LigandProperties`] and the Lipinski verdict

pub mod descriptors;
pub mod properties;
pub mod qed;
pub mod smiles;
pub mod toolkit;
