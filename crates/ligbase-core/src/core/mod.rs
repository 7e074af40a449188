//! # Core Module
//!
//! Stateless data models and pure algorithms shared by every pipeline stage.
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues, chains and the
//!   `MolecularSystem` arena that binding-site scans run over
//! - **File I/O** ([`io`]) - Fixed-column reader for deposited coordinate files
//! - **Annotations** ([`classify`]) - Keyword-driven family tagging and quality tiers
//! - **Ligand Chemistry** ([`chem`]) - SMILES parsing, descriptors and druglikeness
//! - **Records** ([`records`]) - Row types of the tabular artifacts and the store
//! - **Field Decoding** ([`parsing`]) - Multi-strategy decoding of serialized cells
//! - **Identifiers** ([`utils`]) - Residue name tables and id normalization

pub mod chem;
pub mod classify;
pub mod io;
pub mod models;
pub mod parsing;
pub mod records;
pub mod utils;
