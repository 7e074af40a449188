//! # Engine Module
//!
//! Per-item operations of the pipeline. Each operation works on a single
//! structure or a single table row; batching, checkpoint boundaries and
//! artifact writing are left to [`crate::workflows`].
//!
//! ## Architecture
//!
//! - **Base Records** ([`processor`]) - Reduces a coordinate file to its chains and ligands
//! - **Binding Sites** ([`binding_site`]) - Residues within a contact cutoff of a ligand
//! - **Enhancement** ([`enhancer`]) - Merges a base record with metadata and derived annotations
//! - **Import** ([`importer`]) - Upserts enhanced rows into a [`crate::store::StructureStore`]
//! - **Tables** ([`tabular`]) - The CSV artifacts exchanged between stages
//! - **Configuration** ([`config`]) - Builders for the enhancement and import settings
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Stage-level error types

pub mod binding_site;
pub mod config;
pub mod enhancer;
pub mod error;
pub mod importer;
pub mod processor;
pub mod progress;
pub mod tabular;
