use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a protein language model is asked to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PredictionTask {
    /// Fill in the masked (`_`) positions of a sequence.
    MaskedSequenceCompletion,
    /// Predict three-dimensional coordinates for a sequence.
    StructurePrediction,
    /// Predict a sequence that folds into a given structure.
    InverseFolding,
    /// A task chosen by external arguments. No model supports it.
    Unknown,
}

impl PredictionTask {
    /// Whether plain text input for this task is a PDB structure rather than a sequence.
    pub fn takes_structure_text(&self) -> bool {
        matches!(self, PredictionTask::InverseFolding)
    }
}

impl fmt::Display for PredictionTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PredictionTask::MaskedSequenceCompletion => "masked sequence completion",
            PredictionTask::StructurePrediction => "structure prediction",
            PredictionTask::InverseFolding => "inverse folding",
            PredictionTask::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for PredictionTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "masked" | "masked-sequence-completion" | "completion" => {
                Ok(PredictionTask::MaskedSequenceCompletion)
            }
            "structure" | "structure-prediction" | "fold" => Ok(PredictionTask::StructurePrediction),
            "inverse" | "inverse-folding" => Ok(PredictionTask::InverseFolding),
            _ => Err(format!(
                "Unknown prediction task '{}'. Expected masked, structure or inverse.",
                s
            )),
        }
    }
}

/// Shape of a prediction handed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnType {
    /// The predicted sequence, or PDB text for structure prediction.
    #[default]
    String,
    /// The full predicted protein.
    Default,
}
