//! Decoding of structured values stored as text in tabular artifacts.
//!
//! Upstream writers serialize nested values inconsistently, so a cell is run
//! through an ordered list of [`cascade::ParseStrategy`] implementations.

pub mod cascade;
pub mod literal;

pub use cascade::{FieldParseError, FieldParser, ParsedField, is_missing_cell};
