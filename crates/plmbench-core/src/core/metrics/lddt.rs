use super::{MetricError, check_pairs};
use nalgebra::Point3;

#[derive(Debug, Clone, PartialEq)]
pub struct LddtParams {
    /// Reference distances at or beyond this radius are not scored.
    pub inclusion_radius: f64,
    pub thresholds: Vec<f64>,
}

impl Default for LddtParams {
    fn default() -> Self {
        Self {
            inclusion_radius: 15.0,
            thresholds: vec![0.5, 1.0, 2.0, 4.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LddtResult {
    pub global: f64,
    /// Per-residue scores; `None` for residues with no reference neighbor inside the
    /// inclusion radius.
    pub per_residue: Vec<Option<f64>>,
}

/// Cα local distance difference test of `model` against `reference`.
///
/// For each reference pair `(i, j)` closer than the inclusion radius, the model distance is
/// considered preserved at a threshold when it differs from the reference distance by less
/// than that threshold. The score is the preserved fraction averaged over all thresholds.
/// Being superposition-free, the result does not depend on the model's orientation.
pub fn lddt(
    model: &[Point3<f64>],
    reference: &[Point3<f64>],
    params: &LddtParams,
) -> Result<LddtResult, MetricError> {
    check_pairs(model, reference)?;

    let n = reference.len();
    let n_thresholds = params.thresholds.len().max(1) as f64;
    let mut preserved_total = 0.0;
    let mut pairs_total = 0usize;
    let mut per_residue = Vec::with_capacity(n);

    for i in 0..n {
        let mut preserved = 0.0;
        let mut pairs = 0usize;
        for j in 0..n {
            if i == j {
                continue;
            }
            let reference_distance = (reference[i] - reference[j]).norm();
            if reference_distance >= params.inclusion_radius {
                continue;
            }
            let model_distance = (model[i] - model[j]).norm();
            let deviation = (model_distance - reference_distance).abs();
            preserved += params
                .thresholds
                .iter()
                .filter(|&&t| deviation < t)
                .count() as f64;
            pairs += 1;
        }

        if pairs == 0 {
            per_residue.push(None);
        } else {
            per_residue.push(Some(preserved / (pairs as f64 * n_thresholds)));
        }
        preserved_total += preserved;
        pairs_total += pairs;
    }

    let global = if pairs_total == 0 {
        0.0
    } else {
        preserved_total / (pairs_total as f64 * n_thresholds)
    };

    Ok(LddtResult {
        global,
        per_residue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn chain(n: usize) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| Point3::new(3.8 * i as f64, (i % 2) as f64, 0.0))
            .collect()
    }

    #[test]
    fn identical_structures_score_one() {
        let reference = chain(6);
        let result = lddt(&reference, &reference, &LddtParams::default()).unwrap();
        assert_eq!(result.global, 1.0);
        assert!(result.per_residue.iter().all(|s| *s == Some(1.0)));
    }

    #[test]
    fn translation_does_not_change_score() {
        let reference = chain(6);
        let moved: Vec<Point3<f64>> = reference
            .iter()
            .map(|p| p + Vector3::new(50.0, -20.0, 7.0))
            .collect();
        let result = lddt(&moved, &reference, &LddtParams::default()).unwrap();
        assert_eq!(result.global, 1.0);
    }

    #[test]
    fn distorted_pair_lowers_score() {
        let reference = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)];
        // Distance 4.5 instead of 3.0: deviation 1.5 passes only the 2.0 and 4.0 thresholds.
        let model = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(4.5, 0.0, 0.0)];
        let result = lddt(&model, &reference, &LddtParams::default()).unwrap();
        assert!((result.global - 0.5).abs() < 1e-12);
    }

    #[test]
    fn isolated_residues_have_no_per_residue_score() {
        let reference = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(100.0, 0.0, 0.0)];
        let result = lddt(&reference, &reference, &LddtParams::default()).unwrap();
        assert_eq!(result.per_residue, vec![None, None]);
        assert_eq!(result.global, 0.0);
    }
}
