use super::lddt::{LddtParams, lddt};
use super::superposition::rmsd;
use super::tm_score::tm_score;
use super::MetricError;
use crate::core::models::chain::Chain;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use serde::Serialize;
use std::collections::HashMap;

/// How residues of a model are matched to residues of the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResiduePairing {
    /// Match chains by position and residues by number and insertion code.
    ByNumber,
    /// Match chains by position and residues by their index within the chain. Requires
    /// chains of equal length.
    ByIndex,
    /// Use `ByNumber` when it pairs at least half of the shorter structure, else `ByIndex`.
    /// Predicted structures are numbered from 1 while deposited references often are not.
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuralMetrics {
    pub aligned_residues: usize,
    pub rmsd: f64,
    pub lddt: f64,
    pub tm_score: f64,
}

impl StructuralMetrics {
    /// Scores `model` against `reference` over the paired Cα atoms.
    pub fn compare(
        model: &Structure,
        reference: &Structure,
        pairing: ResiduePairing,
    ) -> Result<Self, MetricError> {
        let (model_ca, reference_ca) = paired_alpha_carbons(model, reference, pairing)?;

        Ok(Self {
            aligned_residues: model_ca.len(),
            rmsd: rmsd(&model_ca, &reference_ca)?,
            lddt: lddt(&model_ca, &reference_ca, &LddtParams::default())?.global,
            tm_score: tm_score(&model_ca, &reference_ca)?,
        })
    }
}

type PairedCoordinates = (Vec<Point3<f64>>, Vec<Point3<f64>>);

pub fn paired_alpha_carbons(
    model: &Structure,
    reference: &Structure,
    pairing: ResiduePairing,
) -> Result<PairedCoordinates, MetricError> {
    match pairing {
        ResiduePairing::ByNumber => Ok(pair_by_number(model, reference)),
        ResiduePairing::ByIndex => pair_by_index(model, reference),
        ResiduePairing::Auto => {
            let shorter = model.amino_acid_count().min(reference.amino_acid_count());
            let by_number = pair_by_number(model, reference);
            if by_number.0.len() * 2 >= shorter && !by_number.0.is_empty() {
                Ok(by_number)
            } else {
                pair_by_index(model, reference)
            }
        }
    }
}

fn numbered_alpha_carbons(chain: &Chain) -> HashMap<(isize, Option<char>), Point3<f64>> {
    chain
        .amino_acids()
        .filter_map(|r| r.alpha_carbon().map(|ca| ((r.number, r.insertion_code), *ca)))
        .collect()
}

fn pair_by_number(model: &Structure, reference: &Structure) -> PairedCoordinates {
    let mut model_ca = Vec::new();
    let mut reference_ca = Vec::new();

    for (model_chain, reference_chain) in model.chains.iter().zip(&reference.chains) {
        let reference_lookup = numbered_alpha_carbons(reference_chain);
        for residue in model_chain.amino_acids() {
            let Some(ca) = residue.alpha_carbon() else {
                continue;
            };
            if let Some(reference_position) =
                reference_lookup.get(&(residue.number, residue.insertion_code))
            {
                model_ca.push(*ca);
                reference_ca.push(*reference_position);
            }
        }
    }

    (model_ca, reference_ca)
}

fn pair_by_index(
    model: &Structure,
    reference: &Structure,
) -> Result<PairedCoordinates, MetricError> {
    let mut model_ca = Vec::new();
    let mut reference_ca = Vec::new();

    for (model_chain, reference_chain) in model.chains.iter().zip(&reference.chains) {
        let m = model_chain.ca_positions();
        let r = reference_chain.ca_positions();
        if m.len() != r.len() {
            return Err(MetricError::LengthMismatch {
                left: m.len(),
                right: r.len(),
            });
        }
        model_ca.extend(m);
        reference_ca.extend(r);
    }

    if model_ca.is_empty() {
        return Err(MetricError::Empty);
    }
    Ok((model_ca, reference_ca))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Vector3;

    fn structure_from(first_number: isize, offset: Vector3<f64>, count: usize) -> Structure {
        let mut structure = Structure::new();
        let chain = structure.chain_mut_or_insert('A');
        for i in 0..count {
            let t = i as f64 * 100f64.to_radians();
            let position = Point3::new(2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f64) + offset;
            chain
                .residue_for("ALA", first_number + i as isize, None)
                .atoms
                .push(Atom::new(i + 1, "CA", position));
        }
        structure
    }

    #[test]
    fn identical_structures_give_perfect_metrics() {
        let reference = structure_from(1, Vector3::zeros(), 30);
        let metrics =
            StructuralMetrics::compare(&reference, &reference, ResiduePairing::ByNumber).unwrap();
        assert_eq!(metrics.aligned_residues, 30);
        assert!(metrics.rmsd < 1e-9);
        assert_eq!(metrics.lddt, 1.0);
        assert!((metrics.tm_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn auto_pairing_falls_back_to_index_when_numbering_differs() {
        let reference = structure_from(101, Vector3::zeros(), 30);
        let model = structure_from(1, Vector3::new(3.0, 0.0, 0.0), 30);

        let by_number = paired_alpha_carbons(&model, &reference, ResiduePairing::ByNumber).unwrap();
        assert!(by_number.0.is_empty());

        let metrics = StructuralMetrics::compare(&model, &reference, ResiduePairing::Auto).unwrap();
        assert_eq!(metrics.aligned_residues, 30);
        assert!(metrics.rmsd < 1e-9);
    }

    #[test]
    fn by_number_pairs_only_shared_residues() {
        let reference = structure_from(1, Vector3::zeros(), 30);
        let model = structure_from(11, Vector3::zeros(), 30);
        let (model_ca, reference_ca) =
            paired_alpha_carbons(&model, &reference, ResiduePairing::ByNumber).unwrap();
        assert_eq!(model_ca.len(), 20);
        assert_eq!(reference_ca.len(), 20);
    }

    #[test]
    fn by_index_requires_equal_chain_lengths() {
        let reference = structure_from(1, Vector3::zeros(), 30);
        let model = structure_from(1, Vector3::zeros(), 25);
        assert_eq!(
            paired_alpha_carbons(&model, &reference, ResiduePairing::ByIndex),
            Err(MetricError::LengthMismatch {
                left: 25,
                right: 30
            })
        );
    }
}
