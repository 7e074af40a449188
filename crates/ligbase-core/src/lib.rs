//! # ligbase
//!
//! Enrichment and import pipeline for deposited protein-ligand structures.
//!
//! Raw coordinate files are reduced to base records, enriched with derived
//! annotations (binding pockets, protein families, ligand druglikeness,
//! experimental quality) and finally reconciled into a relational store with
//! idempotent upsert semantics.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless models, the coordinate file reader,
//!   classifiers, ligand chemistry and the record types that flow between stages.
//!
//! - **[`engine`]: Per-item Operations.** Binding-site extraction, base-record
//!   extraction, single-structure enhancement and single-row import
//!   reconciliation, each with its own configuration and error type.
//!
//! - **[`store`]: Persistence.** The transactional [`store::StructureStore`]
//!   contract and its SQLite implementation.
//!
//! - **[`workflows`]: The Public API.** Batch drivers for the `process`,
//!   `enhance` and `import` stages.

pub mod core;
pub mod engine;
pub mod store;
pub mod workflows;
