//! # Core Models Module
//!
//! Data structures for a parsed macromolecular structure: atoms, residues and
//! chains stored in slot-map arenas with stable identifiers.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with name, element and Cartesian position
//! - [`residue`] - Residue with its record classification ([`residue::ResidueKind`])
//! - [`chain`] - Ordered residue membership of one chain
//! - [`system`] - The complete structure with lookups and ordered iteration
//! - [`builder`] - Incremental construction used by file readers
//! - [`ids`] - Unique identifier types for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use ligbase::core::models::{builder::MolecularSystemBuilder, residue::ResidueKind};
//!
//! let mut builder = MolecularSystemBuilder::new();
//! builder.start_residue('A', 301, None, "ATP", ResidueKind::Hetero);
//! builder.add_atom(1, "PG", "P", Point3::origin());
//! let system = builder.build();
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ids;
pub mod residue;
pub mod system;
