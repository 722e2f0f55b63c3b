//! JSON wire format of the ESM3 Forge generation endpoint.

use super::config::{GenerationConfig, Track};
use super::protein::ProteinOutput;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForgeRequest {
    pub model: String,
    pub inputs: ProteinOutput,
    pub track: Track,
    pub num_steps: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ForgeRequest {
    pub fn new(model: impl Into<String>, inputs: ProteinOutput, config: &GenerationConfig) -> Self {
        Self {
            model: model.into(),
            inputs,
            track: config.track,
            num_steps: config.num_steps,
            temperature: config.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForgeResponse {
    pub outputs: ProteinOutput,
}

/// Pulls a human-readable message out of an error response body, falling back to the
/// raw text.
pub fn error_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| ["detail", "error", "message"].iter().find_map(|k| v.get(*k)))
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
        .unwrap_or_else(|| body.trim().to_string())
}
