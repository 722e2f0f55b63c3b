use nalgebra::Point3;

/// Represents a single atom record of a protein structure.
///
/// Atoms carry the subset of PDB columns that survive a read/write round trip through
/// [`crate::core::io::pdb::PdbFile`]. Residue and chain membership is expressed by
/// ownership: an atom lives inside the [`super::residue::Residue`] it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom serial number from the source file.
    pub serial: usize,
    /// The name of the atom (e.g., "CA", "N", "OG1").
    pub name: String,
    /// The element symbol, derived from the atom name when the file omits it.
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Occupancy column; 1.0 when absent.
    pub occupancy: f64,
    /// Temperature factor column. Predicted structures store per-residue confidence here.
    pub b_factor: f64,
    /// Whether the atom came from a `HETATM` record.
    pub is_hetero: bool,
}

impl Atom {
    pub fn new(serial: usize, name: &str, position: Point3<f64>) -> Self {
        Self {
            serial,
            name: name.to_string(),
            element: infer_element(name),
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            is_hetero: false,
        }
    }

    pub fn is_alpha_carbon(&self) -> bool {
        self.name == "CA" && self.element != "CA"
    }

    pub fn is_hydrogen(&self) -> bool {
        matches!(self.element.as_str(), "H" | "D")
    }
}

/// Derives an element symbol from a PDB atom name.
///
/// Protein atom names start with their element letter ("CA" is an alpha carbon, "OG1" an
/// oxygen); names that start with a digit ("1HB") are hydrogens.
pub fn infer_element(atom_name: &str) -> String {
    let trimmed = atom_name.trim();
    match trimmed.chars().find(|c| c.is_ascii_alphabetic()) {
        Some(c) => c.to_ascii_uppercase().to_string(),
        None => String::new(),
    }
}
