//! Settings resolution for the CLI.
//!
//! Values come from three layers, highest precedence first: command-line
//! arguments, the TOML file given with `--config`, and [`defaults`].

pub mod builder;
pub mod defaults;
pub mod file;
