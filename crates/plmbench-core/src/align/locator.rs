use super::error::AlignError;
use super::method::ExternalTool;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves aligner executables.
///
/// Lookup order: an explicit per-tool path, then each search directory in order, then
/// every directory on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct ToolLocator {
    overrides: HashMap<ExternalTool, PathBuf>,
    search_dirs: Vec<PathBuf>,
    use_system_path: bool,
}

impl ToolLocator {
    pub fn new() -> Self {
        Self {
            use_system_path: true,
            ..Default::default()
        }
    }

    pub fn with_override(mut self, tool: ExternalTool, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(tool, path.into());
        self
    }

    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dirs.push(dir.into());
        self
    }

    pub fn without_system_path(mut self) -> Self {
        self.use_system_path = false;
        self
    }

    pub fn locate(&self, tool: ExternalTool) -> Result<PathBuf, AlignError> {
        let mut searched = Vec::new();

        if let Some(path) = self.overrides.get(&tool) {
            if path.is_file() {
                return Ok(path.clone());
            }
            searched.push(path.clone());
        }

        let system_dirs: Vec<PathBuf> = if self.use_system_path {
            env::var_os("PATH")
                .map(|p| env::split_paths(&p).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        for dir in self.search_dirs.iter().chain(system_dirs.iter()) {
            let candidate = dir.join(tool.binary_name());
            if is_executable(&candidate) {
                debug!("Resolved {} to {:?}", tool, &candidate);
                return Ok(candidate);
            }
            searched.push(candidate);
        }

        Err(AlignError::ToolNotFound { tool, searched })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
