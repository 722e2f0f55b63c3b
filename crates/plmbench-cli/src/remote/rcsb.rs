use crate::error::Result;
use tracing::{debug, info, warn};

/// Downloads deposited structures from the RCSB PDB file service.
#[derive(Debug, Clone)]
pub struct RcsbClient {
    client: reqwest::Client,
    base_url: String,
}

impl RcsbClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn pdb_url(&self, pdb_id: &str) -> String {
        format!(
            "{}/{}.pdb",
            self.base_url.trim_end_matches('/'),
            pdb_id.trim()
        )
    }

    /// Fetches `<pdb_id>.pdb`. An unsuccessful HTTP status yields `None`; transport
    /// failures are errors.
    pub async fn download_pdb(&self, pdb_id: &str) -> Result<Option<String>> {
        let url = self.pdb_url(pdb_id);
        debug!("Fetching {}", url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            warn!(
                "RCSB returned {} for {}; recording no structure.",
                response.status(),
                pdb_id
            );
            return Ok(None);
        }

        let text = response.text().await?;
        info!("Downloaded {} ({} bytes)", pdb_id, text.len());
        Ok(Some(text))
    }
}
