//! Provides input functionality for molecular structure file formats.
//!
//! Readers implement the [`traits::MolecularFile`] trait and build a
//! [`MolecularSystem`](crate::core::models::system::MolecularSystem).

pub mod pdb;
pub mod traits;
