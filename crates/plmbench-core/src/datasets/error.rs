use crate::core::io::fasta::FastaError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported table format for '{path}'. Expected a .json or .csv file.", path = path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Index {index} is out of range for a dataset of {len} record(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("FASTA error: {0}")]
    Fasta(#[from] FastaError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid mutation code '{0}'. Expected e.g. 'A123G'.")]
    InvalidMutation(String),

    #[error("Mutation {code} does not match the sequence: {reason}")]
    MutationMismatch { code: String, reason: String },
}
