use super::amino_acids;
use super::atom::Atom;
use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub name: String,                  // Three-letter residue name (e.g., "ALA", "HOH")
    pub number: isize,                 // Residue sequence number from source file
    pub insertion_code: Option<char>,  // PDB insertion code, column 27
    pub atoms: Vec<Atom>,              // Atoms in file order
}

impl Residue {
    pub fn new(name: &str, number: isize, insertion_code: Option<char>) -> Self {
        Self {
            name: name.to_string(),
            number,
            insertion_code,
            atoms: Vec::new(),
        }
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    pub fn alpha_carbon(&self) -> Option<&Point3<f64>> {
        self.atoms
            .iter()
            .find(|a| a.is_alpha_carbon())
            .map(|a| &a.position)
    }

    pub fn one_letter_code(&self) -> Option<char> {
        amino_acids::three_to_one(&self.name)
    }

    /// A residue is part of the polymer if it has an `ATOM` record or a Cα, whatever its
    /// name. Modified residues written as `HETATM` (MSE) still count; waters and ligands
    /// do not. Names outside the standard table read as `X` in sequences.
    pub fn is_amino_acid(&self) -> bool {
        self.atoms.iter().any(|a| !a.is_hetero) || self.alpha_carbon().is_some()
    }

    pub fn same_position(&self, number: isize, insertion_code: Option<char>) -> bool {
        self.number == number && self.insertion_code == insertion_code
    }
}
