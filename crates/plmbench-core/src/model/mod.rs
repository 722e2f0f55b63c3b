//! The protein language model interface and the ESM3 wire format.
//!
//! A model implementation receives a [`ProteinInput`], prepares it for the requested
//! [`PredictionTask`] with [`ProteinInput::prepare`], generates with a
//! [`GenerationConfig`], and shapes the result with [`Prediction::from_output`]. The
//! transport is up to the implementation.

pub mod atom37;
pub mod config;
pub mod error;
pub mod forge;
pub mod protein;
pub mod sequence;
pub mod task;

pub use config::{GenerationConfig, GenerationOptions, Track};
pub use error::ModelError;
pub use protein::{Prediction, ProteinInput, ProteinOutput};
pub use task::{PredictionTask, ReturnType};

use std::future::Future;

pub trait ProteinLanguageModel {
    fn supported_tasks(&self) -> &[PredictionTask];

    fn supports(&self, task: PredictionTask) -> bool {
        self.supported_tasks().contains(&task)
    }

    /// Runs one prediction.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnsupportedTask`] for tasks outside
    /// [`Self::supported_tasks`], and backend or conversion errors otherwise.
    fn predict(
        &self,
        task: PredictionTask,
        input: ProteinInput,
        return_type: ReturnType,
        options: &GenerationOptions,
    ) -> impl Future<Output = Result<Prediction, ModelError>> + Send;
}
