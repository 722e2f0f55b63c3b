use plmbench::align::AlignError;
use plmbench::core::io::fasta::FastaError;
use plmbench::core::io::pdb::PdbError;
use plmbench::core::metrics::MetricError;
use plmbench::datasets::DatasetError;
use plmbench::model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Align(#[from] AlignError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data management error: {0}")]
    Data(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<PdbError> for CliError {
    fn from(e: PdbError) -> Self {
        CliError::Model(ModelError::Pdb(e))
    }
}

impl From<FastaError> for CliError {
    fn from(e: FastaError) -> Self {
        CliError::Dataset(DatasetError::Fasta(e))
    }
}
