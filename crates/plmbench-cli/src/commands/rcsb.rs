use crate::cli::RcsbArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::remote::http_client;
use crate::remote::rcsb::RcsbClient;
use std::fs;
use tracing::info;

pub async fn run(args: RcsbArgs, config: &AppConfig) -> Result<()> {
    let pdb_id = args.pdb_id.trim();
    if pdb_id.is_empty() {
        return Err(CliError::Argument("PDB id must not be empty".to_string()));
    }

    let client = RcsbClient::new(http_client()?, config.datasets.rcsb_url.clone());
    let pdb = client
        .download_pdb(pdb_id)
        .await?
        .ok_or_else(|| CliError::Data(format!("Structure {} was not found on RCSB", pdb_id)))?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &pdb)?;
            info!("Saved {} to {:?}", pdb_id, path);
            println!("✓ {} written to: {}", pdb_id, path.display());
        }
        None => print!("{}", pdb),
    }
    Ok(())
}
