use crate::core::models::structure::Structure;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Defines the interface for reading and writing structure file formats.
///
/// Implementors handle format-specific parsing and serialization; the provided methods
/// add path and in-memory string conveniences on top of the two required ones.
pub trait StructureFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error>;

    /// Writes a structure to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_to(structure: &Structure, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a structure from a file path.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Structure, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Parses a structure held in memory, such as a PDB string returned by a web service
    /// or a model.
    fn read_from_str(contents: &str) -> Result<Structure, Self::Error> {
        let mut reader = Cursor::new(contents.as_bytes());
        Self::read_from(&mut reader)
    }

    /// Writes a structure to a file path.
    fn write_to_path<P: AsRef<Path>>(structure: &Structure, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(structure, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes a structure into an in-memory string.
    fn write_to_string(structure: &Structure) -> Result<String, Self::Error> {
        let mut buffer = Vec::new();
        Self::write_to(structure, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| Self::Error::from(io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}
