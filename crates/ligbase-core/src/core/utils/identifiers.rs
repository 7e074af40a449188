use phf::{Set, phf_set};

static POLAR_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "ARG", "LYS", "ASP", "GLU", "GLN", "ASN", "HIS", "SER", "THR", "TYR",
};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "DOD", "H2O",
};

/// Whether the residue name is one of the ten polar amino acids used for pocket polarity.
pub fn is_polar_residue(residue_name: &str) -> bool {
    POLAR_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn is_water_residue(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim())
}

/// Normalizes a structure identifier to its stored upper-case form.
pub fn normalize_pdb_id(pdb_id: &str) -> String {
    pdb_id.trim().to_ascii_uppercase()
}
