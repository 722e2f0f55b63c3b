use super::error::DatasetError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::future::Future;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A row of a reference dataset.
pub trait DatasetRecord: Serialize + DeserializeOwned + Clone {
    fn pdb_id(&self) -> &str;

    /// The ground-truth amino-acid sequence.
    fn real_fasta(&self) -> &str;

    /// The ground-truth structure as PDB text, if it could be downloaded.
    fn reference_pdb(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// A JSON array with one object per record.
    Json,
    /// A headered CSV file with one row per record.
    Csv,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(TableFormat::Json),
            Some("csv") => Ok(TableFormat::Csv),
            _ => Err(DatasetError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// An in-memory table of dataset records that persists itself as JSON or CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<R> {
    records: Vec<R>,
}

impl<R> Default for Dataset<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R: DatasetRecord> Dataset<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&R, DatasetError> {
        self.records.get(index).ok_or(DatasetError::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn extend(&mut self, other: Dataset<R>) {
        self.records.extend(other.records);
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    /// Writes the table to `path` in the format implied by its extension.
    pub fn save(&self, path: &Path) -> Result<(), DatasetError> {
        let format = TableFormat::from_path(path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!("Saving {} record(s) to {:?} as {:?}", self.len(), path, format);

        match format {
            TableFormat::Json => {
                let mut writer = BufWriter::new(File::create(path)?);
                serde_json::to_writer(&mut writer, &self.records)?;
                writer.flush()?;
            }
            TableFormat::Csv => {
                let mut writer = csv::Writer::from_path(path)?;
                for record in &self.records {
                    writer.serialize(record)?;
                }
                writer.flush()?;
            }
        }
        Ok(())
    }

    /// Reads a table previously written by [`Dataset::save`].
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let format = TableFormat::from_path(path)?;
        let records = match format {
            TableFormat::Json => {
                let reader = BufReader::new(File::open(path)?);
                serde_json::from_reader(reader)?
            }
            TableFormat::Csv => {
                let mut reader = csv::Reader::from_path(path)?;
                reader.deserialize().collect::<Result<Vec<R>, _>>()?
            }
        };
        info!("Loaded dataset from {:?}", path);
        Ok(Self { records })
    }

    /// Loads the table at `path` if it exists; otherwise awaits `build` and saves the
    /// result there. The builder may fail with any error a [`DatasetError`] converts into.
    pub async fn load_or_build<F, Fut, E>(path: &Path, build: F) -> Result<Self, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Self, E>>,
        E: From<DatasetError>,
    {
        if path.exists() {
            info!("Reusing existing table at {:?}", path);
            return Ok(Self::load(path)?);
        }
        let dataset = build().await?;
        dataset.save(path)?;
        Ok(dataset)
    }
}

/// Default cache file name for a dataset in a data directory.
pub fn default_table_path(data_dir: &Path, file_name: &str) -> PathBuf {
    data_dir.join("datasets").join(file_name)
}
