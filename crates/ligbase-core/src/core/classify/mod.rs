//! Rule-based annotations: protein family tags and experimental quality tiers.

pub mod family;
pub mod quality;
