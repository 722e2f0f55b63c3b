//! Native structural similarity metrics.
//!
//! These operate on residue-paired Cα coordinates and do not search for an alignment;
//! sequence-independent structural alignment is the job of the external tools driven by
//! [`crate::align`]. They exist for quick checks of predictions whose residue numbering
//! already matches the reference.

pub mod compare;
pub mod lddt;
pub mod superposition;
pub mod tm_score;

pub use compare::{ResiduePairing, StructuralMetrics};
pub use lddt::{LddtParams, LddtResult, lddt};
pub use superposition::{Superposition, rmsd, rmsd_no_superposition, superpose};
pub use tm_score::tm_score;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricError {
    #[error("Coordinate sets differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[error("Coordinate sets are empty")]
    Empty,
    #[error("Singular value decomposition failed to produce both factors")]
    Decomposition,
}

pub(crate) fn check_pairs<T>(left: &[T], right: &[T]) -> Result<(), MetricError> {
    if left.len() != right.len() {
        return Err(MetricError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    if left.is_empty() {
        return Err(MetricError::Empty);
    }
    Ok(())
}
