use crate::error::{CliError, Result};
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// Shallow-clones `repository` into `destination`, which must not exist yet or be empty.
pub async fn clone_repository(repository: &str, destination: &Path) -> Result<()> {
    info!("Cloning {} into {:?}", repository, destination);
    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--quiet", repository])
        .arg(destination)
        .output()
        .await
        .map_err(|e| {
            CliError::Data(format!(
                "Failed to run git (is it installed and on PATH?): {}",
                e
            ))
        })?;

    if !output.status.success() {
        return Err(CliError::Data(format!(
            "git clone of {} failed: {}",
            repository,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}
