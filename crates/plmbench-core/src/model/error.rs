use super::task::PredictionTask;
use crate::core::io::pdb::PdbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Task {0} is not supported by this model")]
    UnsupportedTask(PredictionTask),

    #[error("Model output is missing its {0}")]
    MissingOutput(&'static str),

    #[error("Residue {residue} has {found} atom slots; expected 37")]
    Atom37Shape { residue: usize, found: usize },

    #[error("Sequence has {sequence} residue(s) but coordinates cover {coordinates}")]
    CoordinateLengthMismatch { sequence: usize, coordinates: usize },

    #[error("Sequences have different lengths ({left} vs {right})")]
    SequenceLengthMismatch { left: usize, right: usize },

    #[error("Structure contains no amino-acid residues")]
    EmptyStructure,

    #[error("PDB error: {0}")]
    Pdb(#[from] PdbError),

    #[error("Model backend error: {0}")]
    Backend(String),
}
