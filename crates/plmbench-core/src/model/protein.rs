use super::atom37::{Atom37Residue, atom37_from_structure, structure_from_atom37};
use super::error::ModelError;
use super::task::{PredictionTask, ReturnType};
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::structure::Structure;
use serde::{Deserialize, Serialize};

/// A protein as the model sees it: an optional sequence and optional 37-atom coordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProteinOutput {
    pub sequence: Option<String>,
    pub coordinates: Option<Vec<Atom37Residue>>,
}

impl ProteinOutput {
    pub fn from_sequence(sequence: impl Into<String>) -> Self {
        Self {
            sequence: Some(sequence.into()),
            coordinates: None,
        }
    }

    pub fn from_structure(structure: &Structure) -> Result<Self, ModelError> {
        let (sequence, coordinates) = atom37_from_structure(structure)?;
        Ok(Self {
            sequence: Some(sequence),
            coordinates: Some(coordinates),
        })
    }

    pub fn from_pdb_str(pdb: &str) -> Result<Self, ModelError> {
        let structure = PdbFile::read_from_str(pdb)?;
        Self::from_structure(&structure)
    }

    pub fn len(&self) -> usize {
        match (&self.sequence, &self.coordinates) {
            (Some(sequence), _) => sequence.chars().count(),
            (None, Some(coordinates)) => coordinates.len(),
            (None, None) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_structure(&self) -> Result<Structure, ModelError> {
        let sequence = self
            .sequence
            .as_deref()
            .ok_or(ModelError::MissingOutput("sequence"))?;
        let coordinates = self
            .coordinates
            .as_deref()
            .ok_or(ModelError::MissingOutput("coordinates"))?;
        structure_from_atom37(sequence, coordinates)
    }

    pub fn to_pdb_string(&self) -> Result<String, ModelError> {
        Ok(PdbFile::write_to_string(&self.to_structure()?)?)
    }
}

/// Input handed to a model: a sequence, a PDB structure, or a previous model output.
#[derive(Debug, Clone, PartialEq)]
pub enum ProteinInput {
    Sequence(String),
    Structure(String),
    Protein(ProteinOutput),
}

impl ProteinInput {
    /// Interprets plain text the way `task` expects it: PDB text for inverse folding and a
    /// sequence for everything else.
    pub fn from_text(task: PredictionTask, text: impl Into<String>) -> Self {
        if task.takes_structure_text() {
            ProteinInput::Structure(text.into())
        } else {
            ProteinInput::Sequence(text.into())
        }
    }

    /// Converts the input into the protein sent to the model, clearing the track the task
    /// is about to generate.
    pub fn prepare(self, task: PredictionTask) -> Result<ProteinOutput, ModelError> {
        let mut protein = match self {
            ProteinInput::Sequence(sequence) => {
                ProteinOutput::from_sequence(sequence.trim().to_string())
            }
            ProteinInput::Structure(pdb) => ProteinOutput::from_pdb_str(&pdb)?,
            ProteinInput::Protein(protein) => protein,
        };

        match task {
            PredictionTask::MaskedSequenceCompletion => {}
            PredictionTask::StructurePrediction => {
                protein.coordinates = None;
                if protein.sequence.is_none() {
                    return Err(ModelError::MissingOutput("sequence"));
                }
            }
            PredictionTask::InverseFolding => {
                protein.sequence = None;
                if protein.coordinates.is_none() {
                    return Err(ModelError::MissingOutput("coordinates"));
                }
            }
            PredictionTask::Unknown => return Err(ModelError::UnsupportedTask(task)),
        }
        Ok(protein)
    }
}

impl From<ProteinOutput> for ProteinInput {
    fn from(protein: ProteinOutput) -> Self {
        ProteinInput::Protein(protein)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    Text(String),
    Protein(ProteinOutput),
}

impl Prediction {
    /// Shapes a generated protein according to the requested return type.
    ///
    /// As text, sequence tasks yield the sequence and structure prediction yields PDB text.
    pub fn from_output(
        task: PredictionTask,
        return_type: ReturnType,
        output: ProteinOutput,
    ) -> Result<Self, ModelError> {
        match return_type {
            ReturnType::Default => Ok(Prediction::Protein(output)),
            ReturnType::String => match task {
                PredictionTask::StructurePrediction => Ok(Prediction::Text(output.to_pdb_string()?)),
                PredictionTask::MaskedSequenceCompletion | PredictionTask::InverseFolding => output
                    .sequence
                    .map(Prediction::Text)
                    .ok_or(ModelError::MissingOutput("sequence")),
                PredictionTask::Unknown => Err(ModelError::UnsupportedTask(task)),
            },
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Prediction::Text(text) => Some(text),
            Prediction::Protein(_) => None,
        }
    }

    /// The prediction as text: itself when already text, otherwise the protein's PDB
    /// rendering or, lacking coordinates, its sequence.
    pub fn into_text(self) -> Result<String, ModelError> {
        match self {
            Prediction::Text(text) => Ok(text),
            Prediction::Protein(protein) if protein.coordinates.is_some() => {
                protein.to_pdb_string()
            }
            Prediction::Protein(protein) => {
                protein.sequence.ok_or(ModelError::MissingOutput("sequence"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALANINE: &str = "\
ATOM      1  N   ALA A   1      -1.195   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      3  C   ALA A   1       1.500   0.000   0.000  1.00  0.00           C
ATOM      4  CB  ALA A   1      -0.500  -0.800   1.200  1.00  0.00           C
END
";

    #[test]
    fn text_input_follows_task() {
        assert_eq!(
            ProteinInput::from_text(PredictionTask::StructurePrediction, "MKV"),
            ProteinInput::Sequence("MKV".to_string())
        );
        assert!(matches!(
            ProteinInput::from_text(PredictionTask::InverseFolding, ALANINE),
            ProteinInput::Structure(_)
        ));
    }

    #[test]
    fn structure_prediction_drops_input_coordinates() {
        let protein = ProteinOutput::from_pdb_str(ALANINE).unwrap();
        let prepared = ProteinInput::Protein(protein)
            .prepare(PredictionTask::StructurePrediction)
            .unwrap();
        assert_eq!(prepared.sequence.as_deref(), Some("A"));
        assert!(prepared.coordinates.is_none());
    }

    #[test]
    fn inverse_folding_drops_input_sequence() {
        let prepared = ProteinInput::Structure(ALANINE.to_string())
            .prepare(PredictionTask::InverseFolding)
            .unwrap();
        assert!(prepared.sequence.is_none());
        assert_eq!(prepared.len(), 1);
    }

    #[test]
    fn inverse_folding_needs_coordinates() {
        assert!(matches!(
            ProteinInput::Sequence("MKV".to_string()).prepare(PredictionTask::InverseFolding),
            Err(ModelError::MissingOutput("coordinates"))
        ));
        assert!(matches!(
            ProteinInput::Sequence("MKV".to_string()).prepare(PredictionTask::Unknown),
            Err(ModelError::UnsupportedTask(_))
        ));
    }

    #[test]
    fn string_prediction_uses_sequence_or_pdb() {
        let protein = ProteinOutput::from_pdb_str(ALANINE).unwrap();

        let text = Prediction::from_output(
            PredictionTask::InverseFolding,
            ReturnType::String,
            protein.clone(),
        )
        .unwrap();
        assert_eq!(text, Prediction::Text("A".to_string()));

        let pdb = Prediction::from_output(
            PredictionTask::StructurePrediction,
            ReturnType::String,
            protein.clone(),
        )
        .unwrap()
        .into_text()
        .unwrap();
        assert!(pdb.starts_with("ATOM"));
        assert!(pdb.contains(" CB "));

        let full =
            Prediction::from_output(PredictionTask::StructurePrediction, ReturnType::Default, protein)
                .unwrap();
        assert!(matches!(full, Prediction::Protein(_)));
        assert_eq!(full.as_text(), None);
    }

    #[test]
    fn missing_sequence_output_is_an_error() {
        let empty = ProteinOutput::default();
        assert!(empty.is_empty());
        assert!(matches!(
            Prediction::from_output(
                PredictionTask::MaskedSequenceCompletion,
                ReturnType::String,
                empty
            ),
            Err(ModelError::MissingOutput("sequence"))
        ));
    }
}
