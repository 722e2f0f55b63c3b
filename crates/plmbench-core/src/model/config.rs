use super::error::ModelError;
use super::task::PredictionTask;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NUM_STEPS: usize = 8;

/// Sampling temperature used for masked completion unless overridden.
pub const MASKED_COMPLETION_TEMPERATURE: f64 = 0.7;

/// The output track the model generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    Sequence,
    Structure,
}

/// Caller-supplied generation settings. Unset fields fall back to per-task defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GenerationOptions {
    pub num_steps: Option<usize>,
    pub temperature: Option<f64>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_steps(mut self, steps: usize) -> Self {
        self.num_steps = Some(steps);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Fully resolved settings for one generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub track: Track,
    pub num_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl GenerationConfig {
    pub fn for_task(
        task: PredictionTask,
        options: &GenerationOptions,
    ) -> Result<Self, ModelError> {
        let (track, default_temperature) = match task {
            PredictionTask::MaskedSequenceCompletion => {
                (Track::Sequence, Some(MASKED_COMPLETION_TEMPERATURE))
            }
            PredictionTask::StructurePrediction => (Track::Structure, None),
            PredictionTask::InverseFolding => (Track::Sequence, None),
            PredictionTask::Unknown => return Err(ModelError::UnsupportedTask(task)),
        };
        Ok(Self {
            track,
            num_steps: options.num_steps.unwrap_or(DEFAULT_NUM_STEPS),
            temperature: options.temperature.or(default_temperature),
        })
    }
}
