use super::residue::Residue;
use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub id: char,
    pub residues: Vec<Residue>,
}

impl Chain {
    pub fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    /// One-letter sequence of the chain's amino-acid residues, in file order.
    pub fn sequence(&self) -> String {
        self.amino_acids()
            .map(|r| r.one_letter_code().unwrap_or('X'))
            .collect()
    }

    pub fn amino_acids(&self) -> impl Iterator<Item = &Residue> {
        self.residues.iter().filter(|r| r.is_amino_acid())
    }

    pub fn ca_positions(&self) -> Vec<Point3<f64>> {
        self.amino_acids()
            .filter_map(|r| r.alpha_carbon().copied())
            .collect()
    }

    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms.len()).sum()
    }

    /// Returns the last residue if it matches the given position, creating a new one
    /// otherwise. PDB files list a residue's atoms contiguously, so only the tail needs
    /// checking.
    pub(crate) fn residue_for(
        &mut self,
        name: &str,
        number: isize,
        insertion_code: Option<char>,
    ) -> &mut Residue {
        let needs_new = match self.residues.last() {
            Some(last) => !last.same_position(number, insertion_code) || last.name != name,
            None => true,
        };
        if needs_new {
            self.residues.push(Residue::new(name, number, insertion_code));
        }
        let last = self.residues.len() - 1;
        &mut self.residues[last]
    }
}
