use super::error::DatasetError;
use super::mutation::Mutation;
use super::table::DatasetRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Default cache file name for the ThermoMutDB subset.
pub const DEFAULT_THERMOMUTDB_TABLE: &str = "thermomutdb_subset_esm3.json";

/// Default location of the mutation manifest selecting which entries to fetch.
pub const DEFAULT_MUTATION_MANIFEST: &str = "data/thermomutdb_alphafold_investigation.csv";

pub const THERMOMUTDB_API_URL: &str = "https://biosig.lab.uq.edu.au/thermomutdb/api/v1";

/// Endpoint listing every ThermoMutDB variant recorded for a UniProt accession.
pub fn variant_information_url(api_base: &str, uniprot: &str) -> String {
    format!(
        "{}/VariantInformation/uniprot/{}",
        api_base.trim_end_matches('/'),
        uniprot.trim()
    )
}

/// One mutation entry with its wild-type sequence and structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermoMutRecord {
    /// UniProt accession of the protein.
    pub target_id: String,
    /// ThermoMutDB identifier of the mutation entry.
    pub target_mutation_id: String,
    pub pdb_id: String,
    pub pdb_wild_id: String,
    /// Substitution in UniProt numbering, e.g. "A123G".
    pub mutation_code: String,
    pub real_fasta: String,
    pub real_pdb_wild: Option<String>,
    /// The full variant-information response, serialized as JSON text.
    pub original_thermomutdb_json: String,
}

impl ThermoMutRecord {
    pub fn new(
        row: &MutationManifestRow,
        info: &VariantInformation,
        real_pdb_wild: Option<String>,
    ) -> Result<Self, DatasetError> {
        Ok(Self {
            target_id: row.uniprot.clone(),
            target_mutation_id: row.id.clone(),
            pdb_id: info.pdb_wild.clone(),
            pdb_wild_id: info.pdb_wild.clone(),
            mutation_code: row.mutation_uniprot.clone(),
            real_fasta: info.sequence.clone(),
            real_pdb_wild,
            original_thermomutdb_json: serde_json::to_string(&info.raw)?,
        })
    }

    pub fn mutation(&self) -> Result<Mutation, DatasetError> {
        self.mutation_code.parse()
    }

    /// The wild-type sequence with this entry's substitution applied.
    pub fn mutant_sequence(&self) -> Result<String, DatasetError> {
        self.mutation()?.apply(&self.real_fasta)
    }
}

impl DatasetRecord for ThermoMutRecord {
    fn pdb_id(&self) -> &str {
        &self.pdb_id
    }

    fn real_fasta(&self) -> &str {
        &self.real_fasta
    }

    fn reference_pdb(&self) -> Option<&str> {
        self.real_pdb_wild.as_deref()
    }
}

/// A row of the mutation manifest. Other columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MutationManifestRow {
    pub id: String,
    #[serde(rename = "UNIPROT")]
    pub uniprot: String,
    #[serde(rename = "MUTATION_uniprot")]
    pub mutation_uniprot: String,
}

pub fn read_manifest(path: &Path) -> Result<Vec<MutationManifestRow>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<MutationManifestRow>, _>>()?;
    Ok(rows)
}

/// The parts of a ThermoMutDB variant-information response the dataset keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantInformation {
    pub sequence: String,
    pub pdb_wild: String,
    pub raw: Value,
}

impl VariantInformation {
    /// Extracts the sequence and wild-type PDB id of the first listed variant.
    ///
    /// Returns `Ok(None)` for an empty response or a first variant without a wild-type
    /// structure, which callers treat as "skip this entry".
    pub fn from_json(raw: Value) -> Result<Option<Self>, DatasetError> {
        let entries = raw.as_array().ok_or_else(|| {
            DatasetError::MalformedResponse("expected a JSON array of variants".to_string())
        })?;
        let Some(first) = entries.first() else {
            return Ok(None);
        };

        let protein = first.get("protein").ok_or_else(|| {
            DatasetError::MalformedResponse("variant is missing 'protein'".to_string())
        })?;
        let sequence = protein
            .get("sequence")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                DatasetError::MalformedResponse("protein is missing 'sequence'".to_string())
            })?
            .trim()
            .to_string();

        let pdb_wild = protein
            .get("PDB_wild")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty());

        Ok(pdb_wild.map(|pdb_wild| Self {
            sequence,
            pdb_wild: pdb_wild.to_string(),
            raw: raw.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn response(pdb_wild: Value) -> Value {
        json!([
            {
                "id": 1021,
                "mutation_code": "A12G",
                "protein": { "sequence": "MKVLAAGGHHKLA", "PDB_wild": pdb_wild, "name": "Lysozyme" }
            },
            {
                "id": 1022,
                "protein": { "sequence": "IGNORED", "PDB_wild": "9ZZZ" }
            }
        ])
    }

    fn manifest_row() -> MutationManifestRow {
        MutationManifestRow {
            id: "1021".to_string(),
            uniprot: "P00698".to_string(),
            mutation_uniprot: "A5G".to_string(),
        }
    }

    #[test]
    fn variant_url_joins_base_and_accession() {
        assert_eq!(
            variant_information_url("https://example.org/api/v1/", " P00698 "),
            "https://example.org/api/v1/VariantInformation/uniprot/P00698"
        );
    }

    #[test]
    fn from_json_reads_first_variant() {
        let info = VariantInformation::from_json(response(json!("1LYZ")))
            .unwrap()
            .unwrap();
        assert_eq!(info.sequence, "MKVLAAGGHHKLA");
        assert_eq!(info.pdb_wild, "1LYZ");
    }

    #[test]
    fn from_json_skips_missing_wild_type_structure() {
        assert_eq!(VariantInformation::from_json(response(Value::Null)).unwrap(), None);
        assert_eq!(VariantInformation::from_json(response(json!(""))).unwrap(), None);
        assert_eq!(VariantInformation::from_json(json!([])).unwrap(), None);
    }

    #[test]
    fn from_json_rejects_unexpected_shapes() {
        assert!(VariantInformation::from_json(json!({"error": "x"})).is_err());
        assert!(VariantInformation::from_json(json!([{"no_protein": 1}])).is_err());
    }

    #[test]
    fn record_combines_manifest_and_response() {
        let info = VariantInformation::from_json(response(json!("1LYZ")))
            .unwrap()
            .unwrap();
        let record = ThermoMutRecord::new(&manifest_row(), &info, Some("PDB".to_string())).unwrap();

        assert_eq!(record.target_id, "P00698");
        assert_eq!(record.target_mutation_id, "1021");
        assert_eq!(record.pdb_id, "1LYZ");
        assert_eq!(record.pdb_wild_id, "1LYZ");
        assert_eq!(record.reference_pdb(), Some("PDB"));
        assert!(record.original_thermomutdb_json.contains("Lysozyme"));
        assert_eq!(record.mutant_sequence().unwrap(), "MKVLGAGGHHKLA");
    }

    #[test]
    fn read_manifest_ignores_extra_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.csv");
        fs::write(
            &path,
            "id,UNIPROT,MUTATION_uniprot,ddG\n1021,P00698,A5G,-1.2\n7,P61626,K1N,0.3\n",
        )
        .unwrap();

        let rows = read_manifest(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], manifest_row());
        assert_eq!(rows[1].mutation_uniprot, "K1N");
    }
}
