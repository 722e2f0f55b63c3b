use super::traits::StructureFile;
use crate::core::models::atom::{Atom, infer_element};
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("No ATOM or HETATM records found")]
    NoAtoms,
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

const MIN_ATOM_LINE_LENGTH: usize = 54;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_float(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_optional_float(line: &str, start: usize, end: usize, default: f64) -> f64 {
    slice_and_trim(line, start, end).parse().unwrap_or(default)
}

/// Reader and writer for the fixed-column Protein Data Bank format.
///
/// Only the first model is read; reading stops at the first `ENDMDL`. Alternate
/// locations other than blank or `A` are skipped so every atom appears once.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut structure = Structure::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let record_type = slice_and_trim(&line, 0, 6);

            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_ATOM_LINE_LENGTH {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let alt_loc = line.get(16..17).unwrap_or(" ");
                    if alt_loc != " " && alt_loc != "A" {
                        continue;
                    }

                    let serial_str = slice_and_trim(&line, 6, 11);
                    let name = slice_and_trim(&line, 12, 16);
                    let res_name = slice_and_trim(&line, 17, 20);
                    let chain_id = line.get(21..22).and_then(|s| s.chars().next());
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let insertion_code = line
                        .get(26..27)
                        .and_then(|s| s.chars().next())
                        .filter(|c| !c.is_whitespace());

                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }

                    // Large files overflow the five-column serial; fall back to position.
                    let serial: usize = serial_str.parse().unwrap_or(line_num);
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;

                    let position = Point3::new(
                        parse_float(&line, 30, 38, line_num)?,
                        parse_float(&line, 38, 46, line_num)?,
                        parse_float(&line, 46, 54, line_num)?,
                    );

                    let element = match slice_and_trim(&line, 76, 78) {
                        "" => infer_element(name),
                        e => e.to_ascii_uppercase(),
                    };

                    let atom = Atom {
                        serial,
                        name: name.to_string(),
                        element,
                        position,
                        occupancy: parse_optional_float(&line, 54, 60, 1.0),
                        b_factor: parse_optional_float(&line, 60, 66, 0.0),
                        is_hetero: record_type == "HETATM",
                    };

                    let chain_id = chain_id.filter(|c| !c.is_whitespace()).unwrap_or('A');
                    structure
                        .chain_mut_or_insert(chain_id)
                        .residue_for(res_name, res_seq, insertion_code)
                        .atoms
                        .push(atom);
                }
                "ENDMDL" => break,
                _ => {}
            }
        }

        if structure.is_empty() {
            return Err(PdbError::NoAtoms);
        }
        Ok(structure)
    }

    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        let mut serial = 1usize;
        for chain in &structure.chains {
            let mut last_polymer = None;
            for residue in &chain.residues {
                for atom in &residue.atoms {
                    let record = if atom.is_hetero { "HETATM" } else { "ATOM" };
                    writeln!(
                        writer,
                        "{:<6}{:>5} {}{:1}{:>3} {:1}{:>4}{:1}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                        record,
                        serial % 100_000,
                        format_atom_name(&atom.name, &atom.element),
                        ' ',
                        residue.name,
                        chain.id,
                        residue.number,
                        residue.insertion_code.unwrap_or(' '),
                        atom.position.x,
                        atom.position.y,
                        atom.position.z,
                        atom.occupancy,
                        atom.b_factor,
                        atom.element,
                    )?;
                    serial += 1;
                }
                if residue.is_amino_acid() {
                    last_polymer = Some(residue);
                }
            }
            if let Some(residue) = last_polymer {
                writeln!(
                    writer,
                    "TER   {:>5}      {:>3} {:1}{:>4}{:1}",
                    serial % 100_000,
                    residue.name,
                    chain.id,
                    residue.number,
                    residue.insertion_code.unwrap_or(' '),
                )?;
                serial += 1;
            }
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

/// Atom names shorter than four characters with a one-letter element start in column 14.
fn format_atom_name(name: &str, element: &str) -> String {
    if name.len() < 4 && element.len() <= 1 {
        format!(" {:<3}", name)
    } else {
        format!("{:<4}", name)
    }
}
