use super::chain::Chain;
use super::residue::Residue;
use nalgebra::Point3;

/// A protein structure: an ordered collection of chains.
///
/// Only the first model of a multi-model file is represented. The structure keeps the
/// file's chain and residue order, which the metrics in [`crate::core::metrics`] rely on
/// when pairing residues between a prediction and its reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    pub chains: Vec<Chain>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }

    /// Returns the chain with the given id, appending a new one if this is the first time
    /// the id is seen.
    pub fn chain_mut_or_insert(&mut self, id: char) -> &mut Chain {
        match self.chains.iter().position(|c| c.id == id) {
            Some(index) => &mut self.chains[index],
            None => {
                self.chains.push(Chain::new(id));
                let last = self.chains.len() - 1;
                &mut self.chains[last]
            }
        }
    }

    /// One-letter sequence of every chain concatenated in chain order.
    pub fn sequence(&self) -> String {
        self.chains.iter().map(Chain::sequence).collect()
    }

    pub fn chain_sequences(&self) -> Vec<(char, String)> {
        self.chains
            .iter()
            .map(|c| (c.id, c.sequence()))
            .filter(|(_, seq)| !seq.is_empty())
            .collect()
    }

    pub fn ca_positions(&self) -> Vec<Point3<f64>> {
        self.chains.iter().flat_map(Chain::ca_positions).collect()
    }

    pub fn residues(&self) -> impl Iterator<Item = (char, &Residue)> {
        self.chains
            .iter()
            .flat_map(|c| c.residues.iter().map(move |r| (c.id, r)))
    }

    pub fn amino_acid_count(&self) -> usize {
        self.chains.iter().map(|c| c.amino_acids().count()).sum()
    }

    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(Chain::atom_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.atom_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;

    fn add_ca(structure: &mut Structure, chain: char, name: &str, number: isize) {
        structure
            .chain_mut_or_insert(chain)
            .residue_for(name, number, None)
            .atoms
            .push(Atom::new(0, "CA", Point3::new(number as f64, 1.0, 2.0)));
    }

    #[test]
    fn chains_are_created_once_and_kept_in_order() {
        let mut structure = Structure::new();
        add_ca(&mut structure, 'B', "GLY", 1);
        add_ca(&mut structure, 'A', "ALA", 1);
        add_ca(&mut structure, 'B', "SER", 2);

        let ids: Vec<char> = structure.chains.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!['B', 'A']);
        assert_eq!(structure.sequence(), "GSA");
        assert_eq!(
            structure.chain_sequences(),
            vec![('B', "GS".to_string()), ('A', "A".to_string())]
        );
    }

    #[test]
    fn counts_and_positions_span_all_chains() {
        let mut structure = Structure::new();
        assert!(structure.is_empty());
        add_ca(&mut structure, 'A', "ALA", 1);
        add_ca(&mut structure, 'B', "VAL", 7);

        assert_eq!(structure.amino_acid_count(), 2);
        assert_eq!(structure.atom_count(), 2);
        assert_eq!(structure.ca_positions()[1], Point3::new(7.0, 1.0, 2.0));
        assert_eq!(structure.residues().count(), 2);
        assert!(structure.chain('B').is_some());
        assert!(structure.chain('C').is_none());
    }
}
