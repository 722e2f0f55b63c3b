use super::{MetricError, check_pairs};
use nalgebra::{Matrix3, Point3, Vector3};

/// An optimal rigid-body transform mapping a mobile coordinate set onto a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    /// Root-mean-square deviation after applying the transform, in Angstroms.
    pub rmsd: f64,
}

impl Superposition {
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }

    pub fn apply_all(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.apply(p)).collect()
    }
}

fn centroid(points: &[Point3<f64>]) -> Vector3<f64> {
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    sum / points.len() as f64
}

/// Computes the Kabsch superposition of `mobile` onto `target`.
///
/// Points are paired by index. The rotation is corrected to be proper (determinant +1)
/// so mirror images are never reported as perfect matches.
pub fn superpose(
    mobile: &[Point3<f64>],
    target: &[Point3<f64>],
) -> Result<Superposition, MetricError> {
    check_pairs(mobile, target)?;

    let mobile_center = centroid(mobile);
    let target_center = centroid(target);

    let mut covariance = Matrix3::<f64>::zeros();
    for (m, t) in mobile.iter().zip(target) {
        covariance += (m.coords - mobile_center) * (t.coords - target_center).transpose();
    }

    let svd = covariance.svd(true, true);
    let u = svd.u.ok_or(MetricError::Decomposition)?;
    let v = svd.v_t.ok_or(MetricError::Decomposition)?.transpose();

    let sign = if (v * u.transpose()).determinant() < 0.0 {
        -1.0
    } else {
        1.0
    };
    let correction = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, sign));
    let rotation = v * correction * u.transpose();
    let translation = target_center - rotation * mobile_center;

    let mut superposition = Superposition {
        rotation,
        translation,
        rmsd: 0.0,
    };
    let moved = superposition.apply_all(mobile);
    superposition.rmsd = rmsd_no_superposition(&moved, target)?;
    Ok(superposition)
}

/// RMSD after optimal superposition.
pub fn rmsd(model: &[Point3<f64>], reference: &[Point3<f64>]) -> Result<f64, MetricError> {
    Ok(superpose(model, reference)?.rmsd)
}

/// RMSD of the coordinates as given, without moving either set.
pub fn rmsd_no_superposition(
    model: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Result<f64, MetricError> {
    check_pairs(model, reference)?;
    let sum_sq: f64 = model
        .iter()
        .zip(reference)
        .map(|(a, b)| (a - b).norm_squared())
        .sum();
    Ok((sum_sq / model.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Unit};

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn sample_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.8, 0.0, 0.0),
            Point3::new(5.0, 3.5, 0.0),
            Point3::new(4.2, 5.1, 3.3),
            Point3::new(1.0, 6.0, 5.5),
        ]
    }

    #[test]
    fn superpose_recovers_rigid_transform() {
        let reference = sample_points();
        let rotation =
            Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::new(1.0, 2.0, 3.0)), 0.7);
        let shift = Vector3::new(10.0, -4.0, 2.5);
        let mobile: Vec<Point3<f64>> = reference.iter().map(|p| rotation * p + shift).collect();

        let superposition = superpose(&mobile, &reference).unwrap();
        assert!(f64_approx_equal(superposition.rmsd, 0.0));

        for (moved, expected) in superposition.apply_all(&mobile).iter().zip(&reference) {
            assert!(f64_approx_equal((moved - expected).norm(), 0.0));
        }
    }

    #[test]
    fn superpose_never_returns_a_reflection() {
        let reference = sample_points();
        let mirrored: Vec<Point3<f64>> = reference
            .iter()
            .map(|p| Point3::new(-p.x, p.y, p.z))
            .collect();

        let superposition = superpose(&mirrored, &reference).unwrap();
        assert!(f64_approx_equal(superposition.rotation.determinant(), 1.0));
        assert!(superposition.rmsd > 0.1);
    }

    #[test]
    fn rmsd_without_superposition_measures_raw_displacement() {
        let a = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let b = vec![Point3::new(0.0, 2.0, 0.0), Point3::new(1.0, 2.0, 0.0)];
        assert!(f64_approx_equal(rmsd_no_superposition(&a, &b).unwrap(), 2.0));
        assert!(f64_approx_equal(rmsd(&a, &b).unwrap(), 0.0));
    }

    #[test]
    fn mismatched_or_empty_inputs_are_rejected() {
        let a = sample_points();
        assert_eq!(
            rmsd(&a, &a[..3]),
            Err(MetricError::LengthMismatch { left: 5, right: 3 })
        );
        assert_eq!(rmsd(&[], &[]), Err(MetricError::Empty));
    }
}
