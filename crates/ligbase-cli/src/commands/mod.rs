pub mod enhance;
pub mod import;
pub mod process;
pub mod properties;
pub mod stats;
