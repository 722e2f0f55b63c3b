use super::superposition::superpose;
use super::{MetricError, check_pairs};
use nalgebra::Point3;

/// Distance scale of the TM-score for a reference of `length` residues.
pub fn d0(length: usize) -> f64 {
    if length <= 21 {
        return 0.5;
    }
    (1.24 * ((length - 15) as f64).cbrt() - 1.8).max(0.5)
}

/// TM-score of residue-paired Cα coordinates, normalized by the reference length.
///
/// The model is placed with a single Kabsch superposition, which is not the TM-score
/// maximizing placement; the value is a lower bound on what TM-align reports for the same
/// residue pairing.
pub fn tm_score(model: &[Point3<f64>], reference: &[Point3<f64>]) -> Result<f64, MetricError> {
    check_pairs(model, reference)?;

    let length = reference.len();
    let scale = d0(length);
    let superposition = superpose(model, reference)?;

    let sum: f64 = superposition
        .apply_all(model)
        .iter()
        .zip(reference)
        .map(|(m, r)| {
            let d = (m - r).norm() / scale;
            1.0 / (1.0 + d * d)
        })
        .sum();
    Ok(sum / length as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn helix(n: usize) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let t = i as f64 * 100f64.to_radians();
                Point3::new(2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f64)
            })
            .collect()
    }

    #[test]
    fn d0_has_floor_for_short_chains() {
        assert_eq!(d0(10), 0.5);
        assert_eq!(d0(21), 0.5);
        assert!(d0(100) > 3.0 && d0(100) < 4.0);
    }

    #[test]
    fn identical_structures_score_one() {
        let reference = helix(40);
        let score = tm_score(&reference, &reference).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rigidly_moved_model_still_scores_one() {
        let reference = helix(40);
        let model: Vec<Point3<f64>> = reference
            .iter()
            .map(|p| p + Vector3::new(5.0, 5.0, 5.0))
            .collect();
        let score = tm_score(&model, &reference).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn perturbed_model_scores_between_zero_and_one() {
        let reference = helix(40);
        let model: Vec<Point3<f64>> = reference
            .iter()
            .enumerate()
            .map(|(i, p)| p + Vector3::new(if i % 2 == 0 { 2.0 } else { -2.0 }, 0.0, 0.0))
            .collect();
        let score = tm_score(&model, &reference).unwrap();
        assert!(score > 0.0 && score < 1.0);
    }
}
