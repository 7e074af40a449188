use crate::core::io::traits::MolecularFile;
use crate::core::models::builder::MolecularSystemBuilder;
use crate::core::models::residue::ResidueKind;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

/// Header information picked up while reading a PDB file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Four-character identifier from the `HEADER` record, if present.
    pub id_code: Option<String>,
    /// Concatenated `TITLE` continuation lines.
    pub title: String,
    /// Number of models in the file; a file without `MODEL` records has one.
    pub model_count: usize,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_coordinate(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let raw = slice_and_trim(line, start, end);
    raw.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: raw.into(),
        },
    })
}

fn column_char(line: &str, index: usize) -> char {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ')
}

/// Element from columns 77-78, falling back to the leading letter of the atom name.
fn element_symbol(line: &str, atom_name: &str) -> String {
    let explicit = slice_and_trim(line, 76, 78);
    if !explicit.is_empty() {
        return explicit.to_ascii_uppercase();
    }
    atom_name
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_default()
}

/// Fixed-column reader for the PDB format.
///
/// Only the coordinates of the first model are read; later models are only
/// counted. Alternate locations other than blank or `A` are skipped.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut builder = MolecularSystemBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut current_key: Option<(char, isize, Option<char>)> = None;
        let mut atom_count = 0usize;
        let mut first_model_done = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "HEADER" => {
                    let id = slice_and_trim(&line, 62, 66);
                    if !id.is_empty() {
                        metadata.id_code = Some(id.to_ascii_uppercase());
                    }
                }
                "TITLE" => {
                    let part = slice_and_trim(&line, 10, 80);
                    if !metadata.title.is_empty() {
                        metadata.title.push(' ');
                    }
                    metadata.title.push_str(part);
                }
                "MODEL" => metadata.model_count += 1,
                "ENDMDL" => first_model_done = true,
                "END" => break,
                _ if first_model_done => {}
                record @ ("ATOM" | "HETATM") => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let alt_loc = column_char(&line, 16);
                    if alt_loc != ' ' && alt_loc != 'A' {
                        continue;
                    }

                    let name = slice_and_trim(&line, 12, 16);
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }

                    let serial_str = slice_and_trim(&line, 6, 11);
                    let serial: usize = serial_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "7-11".into(),
                            value: serial_str.into(),
                        },
                    })?;

                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_id = column_char(&line, 21);
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;

                    let insertion_code = Some(column_char(&line, 26)).filter(|c| *c != ' ');

                    let x = parse_coordinate(&line, line_num, 30, 38)?;
                    let y = parse_coordinate(&line, line_num, 38, 46)?;
                    let z = parse_coordinate(&line, line_num, 46, 54)?;

                    let key = (chain_id, res_seq, insertion_code);
                    if current_key != Some(key) {
                        let kind = ResidueKind::classify(record == "HETATM", res_name);
                        builder.start_residue(chain_id, res_seq, insertion_code, res_name, kind);
                        current_key = Some(key);
                    }

                    let element = element_symbol(&line, name);
                    if builder
                        .add_atom(serial, name, &element, Point3::new(x, y, z))
                        .is_some()
                    {
                        atom_count += 1;
                    }
                }
                _ => {}
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM".into()));
        }

        metadata.model_count = metadata.model_count.max(1);
        Ok((builder.build(), metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom_line(
        record: &str,
        serial: usize,
        name: &str,
        alt: char,
        res_name: &str,
        chain: char,
        res_seq: isize,
        xyz: (f64, f64, f64),
        element: &str,
    ) -> String {
        format!(
            "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            record, serial, name, alt, res_name, chain, res_seq, xyz.0, xyz.1, xyz.2, 1.0, 20.0, element
        )
    }

    fn read(content: &str) -> Result<(MolecularSystem, PdbMetadata), PdbError> {
        PdbFile::read_from_str(content)
    }

    fn sample() -> String {
        [
            format!("HEADER    {:<40}{:<9}   {}", "TRANSFERASE", "01-JAN-00", "1ABC"),
            "TITLE     TYROSINE KINASE DOMAIN".to_string(),
            "TITLE    2 IN COMPLEX WITH ATP".to_string(),
            "MODEL        1".to_string(),
            atom_line("ATOM", 1, "N", ' ', "SER", 'A', 10, (0.0, 0.0, 0.0), "N"),
            atom_line("ATOM", 2, "OG", ' ', "SER", 'A', 10, (1.0, 0.0, 0.0), "O"),
            atom_line("ATOM", 3, "CB", 'A', "ALA", 'A', 11, (2.0, 0.0, 0.0), "C"),
            atom_line("ATOM", 4, "CB", 'B', "ALA", 'A', 11, (2.5, 0.0, 0.0), "C"),
            atom_line("HETATM", 5, "PG", ' ', "ATP", 'A', 301, (3.0, 0.0, 0.0), "P"),
            atom_line("HETATM", 6, "O", ' ', "HOH", 'A', 401, (9.0, 9.0, 9.0), "O"),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom_line("ATOM", 7, "N", ' ', "GLY", 'B', 1, (0.0, 0.0, 0.0), "N"),
            "ENDMDL".to_string(),
            "END".to_string(),
        ]
        .join("\n")
    }

    #[test]
    fn reads_first_model_and_header_metadata() {
        let (system, metadata) = read(&sample()).unwrap();
        assert_eq!(metadata.id_code.as_deref(), Some("1ABC"));
        assert_eq!(metadata.title, "TYROSINE KINASE DOMAIN IN COMPLEX WITH ATP");
        assert_eq!(metadata.model_count, 2);
        assert!(system.find_chain_by_id('B').is_none());

        let chain = system.find_chain_by_id('A').unwrap();
        assert_eq!(system.chain(chain).unwrap().residues().len(), 4);
    }

    #[test]
    fn classifies_residues_by_record_and_name() {
        let (system, _) = read(&sample()).unwrap();
        let chain = system.find_chain_by_id('A').unwrap();
        let kind = |n| system.residue(system.find_residue_by_id(chain, n, None).unwrap()).unwrap().kind;
        assert_eq!(kind(10), ResidueKind::Standard);
        assert_eq!(kind(301), ResidueKind::Hetero);
        assert_eq!(kind(401), ResidueKind::Water);
    }

    #[test]
    fn keeps_only_primary_alternate_location() {
        let (system, _) = read(&sample()).unwrap();
        let chain = system.find_chain_by_id('A').unwrap();
        let ala = system.find_residue_by_id(chain, 11, None).unwrap();
        let atoms: Vec<_> = system.residue_atoms(ala).collect();
        assert_eq!(atoms.len(), 1);
        assert!((atoms[0].position.x - 2.0).abs() < 1e-9);
    }

    #[test]
    fn insertion_codes_start_new_residues() {
        let mut inserted = atom_line("ATOM", 2, "CA", ' ', "ALA", 'A', 52, (2.0, 0.0, 0.0), "C");
        inserted.replace_range(26..27, "A");
        let content = [
            atom_line("ATOM", 1, "CA", ' ', "SER", 'A', 52, (30.0, 0.0, 0.0), "C"),
            inserted,
        ]
        .join("\n");

        let (system, _) = read(&content).unwrap();
        let chain = system.find_chain_by_id('A').unwrap();
        assert_eq!(system.chain(chain).unwrap().residues().len(), 2);
        let ala = system.find_residue_by_id(chain, 52, Some('A')).unwrap();
        let ala = system.residue(ala).unwrap();
        assert_eq!(ala.name, "ALA");
        assert_eq!(ala.atoms().len(), 1);
        let ser = system.find_residue_by_id(chain, 52, None).unwrap();
        assert_eq!(system.residue(ser).unwrap().name, "SER");
    }

    #[test]
    fn infers_element_from_atom_name_when_columns_are_missing() {
        let line = atom_line("HETATM", 1, "CL1", ' ', "LIG", 'A', 1, (0.0, 0.0, 0.0), "");
        let (system, metadata) = read(&line).unwrap();
        assert_eq!(metadata.model_count, 1);
        let chain = system.find_chain_by_id('A').unwrap();
        let ligand = system.find_residue_by_id(chain, 1, None).unwrap();
        let atom = system.residue_atoms(ligand).next().unwrap();
        assert_eq!(atom.element, "C");
    }

    #[test]
    fn rejects_invalid_coordinates_with_line_number() {
        let mut line = atom_line("ATOM", 1, "N", ' ', "SER", 'A', 1, (0.0, 0.0, 0.0), "N");
        line.replace_range(30..38, "   abc  ");
        let err = read(&format!("REMARK\n{line}")).unwrap_err();
        match err {
            PdbError::Parse { line, kind } => {
                assert_eq!(line, 2);
                assert!(matches!(kind, PdbParseErrorKind::InvalidFloat { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_truncated_atom_records() {
        let err = read("ATOM      1  N   SER A   1      0.000").unwrap_err();
        assert!(matches!(
            err,
            PdbError::Parse {
                kind: PdbParseErrorKind::LineTooShort,
                ..
            }
        ));
    }

    #[test]
    fn file_without_atoms_is_an_error() {
        let err = read("HEADER    EMPTY\nEND\n").unwrap_err();
        assert!(matches!(err, PdbError::MissingRecord(_)));
    }
}
