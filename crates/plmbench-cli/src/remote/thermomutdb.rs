use crate::error::Result;
use plmbench::datasets::thermomutdb::variant_information_url;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ThermoMutClient {
    client: reqwest::Client,
    api_base: String,
}

impl ThermoMutClient {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
        }
    }

    /// Raw variant-information response for a UniProt accession. Error statuses fail.
    pub async fn variant_information(&self, uniprot: &str) -> Result<Value> {
        let url = variant_information_url(&self.api_base, uniprot);
        debug!("Fetching {}", url);
        let value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }
}
