//! # Workflows Module
//!
//! Batch entry points for the three pipeline stages. Each workflow drives the
//! matching per-item operation from [`crate::engine`] over a whole batch,
//! reports progress through a [`crate::engine::progress::ProgressReporter`]
//! and writes the stage artifact.
//!
//! - **Processing** ([`process`]) - Coordinate files to `processed_structures.csv`
//! - **Enhancement** ([`enhance`]) - Base records plus metadata to `enhanced_structures.csv`
//! - **Import** ([`import`]) - Enhanced rows reconciled into a structure store

pub mod enhance;
pub mod import;
pub mod process;
