use crate::config::ModelSettings;
use crate::error::{CliError, Result};
use plmbench::model::forge::{ForgeRequest, ForgeResponse, error_message};
use plmbench::model::{
    GenerationConfig, GenerationOptions, ModelError, Prediction, PredictionTask, ProteinInput,
    ProteinLanguageModel, ReturnType,
};
use tracing::{debug, info};

const SUPPORTED_TASKS: [PredictionTask; 3] = [
    PredictionTask::MaskedSequenceCompletion,
    PredictionTask::StructurePrediction,
    PredictionTask::InverseFolding,
];

/// ESM3 reached over the Forge HTTP API.
#[derive(Debug, Clone)]
pub struct ForgeModel {
    client: reqwest::Client,
    endpoint: String,
    model_id: String,
    token: String,
}

impl ForgeModel {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        model_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model_id: model_id.into(),
            token: token.into(),
        }
    }

    /// Builds a client from the settings, reading the token from the first configured
    /// environment variable that is set.
    pub fn from_settings(client: reqwest::Client, settings: &ModelSettings) -> Result<Self> {
        let token = resolve_token(&settings.token_envs, |key| std::env::var(key).ok())
            .ok_or_else(|| {
                CliError::Config(format!(
                    "No model API token found. Set one of: {} (a .env file is read too).",
                    settings.token_envs.join(", ")
                ))
            })?;
        Ok(Self::new(
            client,
            settings.endpoint.clone(),
            settings.model_id.clone(),
            token,
        ))
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

pub fn resolve_token(
    keys: &[String],
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn backend(e: reqwest::Error) -> ModelError {
    ModelError::Backend(e.to_string())
}

impl ProteinLanguageModel for ForgeModel {
    fn supported_tasks(&self) -> &[PredictionTask] {
        &SUPPORTED_TASKS
    }

    async fn predict(
        &self,
        task: PredictionTask,
        input: ProteinInput,
        return_type: ReturnType,
        options: &GenerationOptions,
    ) -> std::result::Result<Prediction, ModelError> {
        if !self.supports(task) {
            return Err(ModelError::UnsupportedTask(task));
        }
        let config = GenerationConfig::for_task(task, options)?;
        let protein = input.prepare(task)?;
        info!(
            "Requesting {} of {} residue(s) from {} ({} step(s))",
            task,
            protein.len(),
            self.model_id,
            config.num_steps
        );

        let request = ForgeRequest::new(self.model_id.clone(), protein, &config);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(backend)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Backend(format!(
                "{} returned {}: {}",
                self.endpoint,
                status,
                error_message(&body)
            )));
        }

        let parsed: ForgeResponse = response.json().await.map_err(backend)?;
        debug!("Received output of {} residue(s)", parsed.outputs.len());
        Prediction::from_output(task, return_type, parsed.outputs)
    }
}
