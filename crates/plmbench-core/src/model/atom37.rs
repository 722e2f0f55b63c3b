use super::error::ModelError;
use crate::core::models::amino_acids;
use crate::core::models::atom::Atom;
use crate::core::models::chain::Chain;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use nalgebra::Point3;

/// Heavy-atom slots of the 37-atom residue representation, in wire order.
pub const ATOM37_NAMES: [&str; 37] = [
    "N", "CA", "C", "CB", "O", "CG", "CG1", "CG2", "OG", "OG1", "SG", "CD", "CD1", "CD2", "ND1",
    "ND2", "OD1", "OD2", "SD", "CE", "CE1", "CE2", "CE3", "NE", "NE1", "NE2", "OE1", "OE2", "CH2",
    "NH1", "NH2", "OH", "CZ", "CZ2", "CZ3", "NZ", "OXT",
];

/// Coordinates of one residue: 37 slots, `None` where the atom is absent.
pub type Atom37Residue = Vec<Option<[f64; 3]>>;

pub fn atom37_index(atom_name: &str) -> Option<usize> {
    ATOM37_NAMES.iter().position(|name| *name == atom_name)
}

/// Flattens the amino-acid residues of every chain into a sequence and matching
/// 37-slot coordinates. Atoms outside the layout (hydrogens, ligands) are dropped.
pub fn atom37_from_structure(
    structure: &Structure,
) -> Result<(String, Vec<Atom37Residue>), ModelError> {
    let mut sequence = String::new();
    let mut coordinates = Vec::new();

    for chain in &structure.chains {
        for residue in chain.amino_acids() {
            sequence.push(residue.one_letter_code().unwrap_or('X'));
            let mut slots: Atom37Residue = vec![None; ATOM37_NAMES.len()];
            for atom in &residue.atoms {
                if let Some(index) = atom37_index(&atom.name) {
                    let p = atom.position;
                    slots[index] = Some([p.x, p.y, p.z]);
                }
            }
            coordinates.push(slots);
        }
    }

    if sequence.is_empty() {
        return Err(ModelError::EmptyStructure);
    }
    Ok((sequence, coordinates))
}

/// Builds a single-chain structure from a sequence and its 37-slot coordinates.
///
/// Residues are numbered from 1 on chain `A`. Slots holding `None` or non-finite values
/// produce no atom.
pub fn structure_from_atom37(
    sequence: &str,
    coordinates: &[Atom37Residue],
) -> Result<Structure, ModelError> {
    let residue_count = sequence.chars().count();
    if residue_count != coordinates.len() {
        return Err(ModelError::CoordinateLengthMismatch {
            sequence: residue_count,
            coordinates: coordinates.len(),
        });
    }

    let mut chain = Chain::new('A');
    let mut serial = 1;
    for (index, (code, slots)) in sequence.chars().zip(coordinates).enumerate() {
        if slots.len() != ATOM37_NAMES.len() {
            return Err(ModelError::Atom37Shape {
                residue: index + 1,
                found: slots.len(),
            });
        }

        let name = amino_acids::one_to_three(code.to_ascii_uppercase()).unwrap_or("UNK");
        let mut residue = Residue::new(name, index as isize + 1, None);
        for (atom_name, slot) in ATOM37_NAMES.iter().zip(slots) {
            let Some([x, y, z]) = slot else { continue };
            if !(x.is_finite() && y.is_finite() && z.is_finite()) {
                continue;
            }
            residue
                .atoms
                .push(Atom::new(serial, atom_name, Point3::new(*x, *y, *z)));
            serial += 1;
        }
        chain.residues.push(residue);
    }

    let mut structure = Structure::new();
    structure.chains.push(chain);
    Ok(structure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::PdbFile;
    use crate::core::io::traits::StructureFile;

    const DIPEPTIDE: &str = "\
ATOM      1  N   GLY A   1      -1.195   0.000   0.000  1.00  0.00           N
ATOM      2  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      3  C   GLY A   1       1.500   0.000   0.000  1.00  0.00           C
ATOM      4  O   GLY A   1       2.100   1.000   0.000  1.00  0.00           O
ATOM      5  N   SER A   2       2.200  -1.100   0.000  1.00  0.00           N
ATOM      6  CA  SER A   2       3.600  -1.200   0.000  1.00  0.00           C
ATOM      7  H   SER A   2       1.800  -1.900   0.000  1.00  0.00           H
ATOM      8  OG  SER A   2       4.100  -2.500   0.300  1.00  0.00           O
END
";

    #[test]
    fn layout_has_unique_names_with_backbone_first() {
        assert_eq!(atom37_index("N"), Some(0));
        assert_eq!(atom37_index("CA"), Some(1));
        assert_eq!(atom37_index("OXT"), Some(36));
        assert_eq!(atom37_index("H"), None);
        for (i, name) in ATOM37_NAMES.iter().enumerate() {
            assert_eq!(atom37_index(name), Some(i));
        }
    }

    #[test]
    fn structure_flattens_into_slots() {
        let structure = PdbFile::read_from_str(DIPEPTIDE).unwrap();
        let (sequence, coords) = atom37_from_structure(&structure).unwrap();

        assert_eq!(sequence, "GS");
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[0][1], Some([0.0, 0.0, 0.0]));
        assert_eq!(coords[0][3], None, "glycine has no CB");
        assert_eq!(coords[1][8], Some([4.1, -2.5, 0.3]));
        assert_eq!(coords[1].iter().flatten().count(), 3, "hydrogen is dropped");
    }

    #[test]
    fn slots_rebuild_a_structure() {
        let original = PdbFile::read_from_str(DIPEPTIDE).unwrap();
        let (sequence, coords) = atom37_from_structure(&original).unwrap();
        let rebuilt = structure_from_atom37(&sequence, &coords).unwrap();

        assert_eq!(rebuilt.sequence(), "GS");
        assert_eq!(rebuilt.atom_count(), 7);
        assert_eq!(rebuilt.ca_positions(), original.ca_positions());
        let serine = &rebuilt.chains[0].residues[1];
        assert_eq!(serine.name, "SER");
        assert_eq!(serine.number, 2);
        assert_eq!(serine.atom("OG").unwrap().element, "O");
    }

    #[test]
    fn non_finite_slots_are_skipped() {
        let mut slots: Atom37Residue = vec![None; 37];
        slots[1] = Some([f64::NAN, 0.0, 0.0]);
        slots[0] = Some([1.0, 2.0, 3.0]);
        let structure = structure_from_atom37("A", &[slots]).unwrap();
        assert_eq!(structure.atom_count(), 1);
    }

    #[test]
    fn shape_errors_are_reported() {
        assert!(matches!(
            structure_from_atom37("AG", &[vec![None; 37]]),
            Err(ModelError::CoordinateLengthMismatch { sequence: 2, coordinates: 1 })
        ));
        assert!(matches!(
            structure_from_atom37("A", &[vec![None; 14]]),
            Err(ModelError::Atom37Shape { residue: 1, found: 14 })
        ));
        assert!(matches!(
            atom37_from_structure(&Structure::new()),
            Err(ModelError::EmptyStructure)
        ));
    }
}
