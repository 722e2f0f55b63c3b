use crate::error::{CliError, Result};
use plmbench::align::AlignmentMethod;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub model: Option<FileModelConfig>,
    pub comparison: Option<FileComparisonConfig>,
    pub datasets: Option<FileDatasetsConfig>,
    pub view: Option<FileViewConfig>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileModelConfig {
    pub endpoint: Option<String>,
    pub model_id: Option<String>,
    pub token_env: Option<String>,
    pub num_steps: Option<usize>,
    pub temperature: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileComparisonConfig {
    pub method: Option<AlignmentMethod>,
    pub multimer_mode: Option<u8>,
    pub ter_mode: Option<u8>,
    pub average_length: Option<bool>,
    /// Passed to the alignment tool after the generated flags.
    pub extra_args: Option<Vec<String>>,
    pub tmalign_path: Option<PathBuf>,
    pub usalign_path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileDatasetsConfig {
    pub casp_repository: Option<String>,
    pub rcsb_url: Option<String>,
    pub thermomutdb_url: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileViewConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
