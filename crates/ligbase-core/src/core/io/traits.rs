use crate::core::models::system::MolecularSystem;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// A coordinate file format that can be loaded into a [`MolecularSystem`].
pub trait MolecularFile {
    /// Header information returned next to the system.
    type Metadata;
    type Error: Error + From<io::Error>;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error>;

    /// Opens and parses `path`. A missing file surfaces through the format's
    /// own error type.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }

    fn read_from_str(content: &str) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        Self::read_from(&mut content.as_bytes())
    }
}
