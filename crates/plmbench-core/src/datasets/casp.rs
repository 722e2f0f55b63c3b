use super::error::DatasetError;
use super::table::DatasetRecord;
use crate::core::io::fasta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::warn;

/// Default cache file name for the combined CASP table.
pub const DEFAULT_CASP_TABLE: &str = "casp10_to_14_dataset.json";

/// Git repository holding the curated CASP domain summaries and FASTA files.
pub const CASP_DATASETS_REPOSITORY: &str = "https://github.com/Eryk96/CASP-Datasets.git";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaspVersion {
    Casp10,
    Casp11,
    Casp12,
    Casp13,
    Casp14,
    #[default]
    Combined,
}

impl CaspVersion {
    pub const INDIVIDUAL: [CaspVersion; 5] = [
        CaspVersion::Casp10,
        CaspVersion::Casp11,
        CaspVersion::Casp12,
        CaspVersion::Casp13,
        CaspVersion::Casp14,
    ];

    /// The individual rounds this version stands for, oldest first.
    pub fn expand(&self) -> Vec<CaspVersion> {
        match self {
            CaspVersion::Combined => Self::INDIVIDUAL.to_vec(),
            single => vec![*single],
        }
    }

    /// Lower-case directory name under the repository's `data/` folder.
    pub fn folder_name(&self) -> &'static str {
        match self {
            CaspVersion::Casp10 => "casp10",
            CaspVersion::Casp11 => "casp11",
            CaspVersion::Casp12 => "casp12",
            CaspVersion::Casp13 => "casp13",
            CaspVersion::Casp14 => "casp14",
            CaspVersion::Combined => "combined",
        }
    }
}

impl fmt::Display for CaspVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.folder_name().to_uppercase())
    }
}

impl FromStr for CaspVersion {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "casp10" | "10" => Ok(CaspVersion::Casp10),
            "casp11" | "11" => Ok(CaspVersion::Casp11),
            "casp12" | "12" => Ok(CaspVersion::Casp12),
            "casp13" | "13" => Ok(CaspVersion::Casp13),
            "casp14" | "14" => Ok(CaspVersion::Casp14),
            "combined" | "all" => Ok(CaspVersion::Combined),
            _ => Err(format!(
                "Unknown CASP version '{}'. Expected CASP10-CASP14 or COMBINED.",
                s
            )),
        }
    }
}

/// One CASP target with its experimentally determined reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaspRecord {
    /// Round the target belongs to, e.g. "casp12".
    pub subset: String,
    pub target_id: String,
    pub pdb_id: String,
    pub real_fasta: String,
    pub real_pdb: Option<String>,
}

impl DatasetRecord for CaspRecord {
    fn pdb_id(&self) -> &str {
        &self.pdb_id
    }

    fn real_fasta(&self) -> &str {
        &self.real_fasta
    }

    fn reference_pdb(&self) -> Option<&str> {
        self.real_pdb.as_deref()
    }
}

/// A row of a round's `domain_summary.csv`. Other columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DomainSummaryRow {
    pub target: String,
    pub pdb: String,
}

/// A target resolved from a local checkout, still lacking its reference structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaspTarget {
    pub version: CaspVersion,
    pub target_id: String,
    pub pdb_id: String,
    pub sequence: String,
}

impl CaspTarget {
    pub fn into_record(self, real_pdb: Option<String>) -> CaspRecord {
        CaspRecord {
            subset: self.version.folder_name().to_string(),
            target_id: self.target_id,
            pdb_id: self.pdb_id,
            real_fasta: self.sequence,
            real_pdb,
        }
    }
}

/// Paths inside a checkout of the CASP-Datasets repository.
#[derive(Debug, Clone)]
pub struct CaspCheckout {
    root: PathBuf,
}

impl CaspCheckout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version_dir(&self, version: CaspVersion) -> PathBuf {
        self.root.join("data").join(version.folder_name())
    }

    pub fn domain_summary_path(&self, version: CaspVersion) -> PathBuf {
        self.version_dir(version).join("domain_summary.csv")
    }

    pub fn fasta_path(&self, version: CaspVersion, pdb_id: &str) -> PathBuf {
        self.version_dir(version)
            .join("fasta")
            .join(format!("{}.fasta", pdb_id))
    }

    pub fn is_populated(&self, version: CaspVersion) -> bool {
        self.domain_summary_path(version).is_file()
    }

    pub fn read_domain_summary(
        &self,
        version: CaspVersion,
    ) -> Result<Vec<DomainSummaryRow>, DatasetError> {
        let mut reader = csv::Reader::from_path(self.domain_summary_path(version))?;
        let rows = reader
            .deserialize()
            .collect::<Result<Vec<DomainSummaryRow>, _>>()?;
        Ok(rows)
    }

    /// Resolves every target of a round to its sequence.
    ///
    /// Targets whose FASTA file is missing or unreadable are skipped with a warning.
    pub fn targets(&self, version: CaspVersion) -> Result<Vec<CaspTarget>, DatasetError> {
        let mut targets = Vec::new();
        for row in self.read_domain_summary(version)? {
            let fasta_path = self.fasta_path(version, &row.pdb);
            let sequence = match fs::read_to_string(&fasta_path)
                .map_err(DatasetError::from)
                .and_then(|contents| fasta::first_sequence(&contents).map_err(DatasetError::from))
            {
                Ok(sequence) => sequence,
                Err(e) => {
                    warn!("Skipping target {} ({}): {}", row.target, row.pdb, e);
                    continue;
                }
            };
            targets.push(CaspTarget {
                version,
                target_id: row.target,
                pdb_id: row.pdb,
                sequence,
            });
        }
        Ok(targets)
    }
}
