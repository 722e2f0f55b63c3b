use crate::error::{CliError, Result};
use directories::ProjectDirs;
use futures_util::StreamExt;
use plmbench::align::ExternalTool;
use plmbench::align::build::compile_tool;
use plmbench::datasets::default_table_path;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum DataProgress {
    DownloadStarted {
        tool: ExternalTool,
        total_size: Option<u64>,
    },
    Downloading {
        downloaded: u64,
    },
    Compiling {
        tool: ExternalTool,
    },
    Installed {
        tool: ExternalTool,
        path: PathBuf,
    },
    Skipped {
        tool: ExternalTool,
    },
}

#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_data_path()?;
        debug!("DataManager initialized with path: {:?}", &path);
        Ok(Self { base_path: path })
    }

    pub fn with_custom_path(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn tools_dir(&self) -> PathBuf {
        self.base_path.join("tools")
    }

    pub fn table_path(&self, file_name: &str) -> PathBuf {
        default_table_path(&self.base_path, file_name)
    }

    pub fn tool_path(&self, tool: ExternalTool) -> PathBuf {
        self.tools_dir().join(tool.binary_name())
    }

    /// Downloads each tool's C++ source into `tools/` and compiles it there.
    pub async fn install_tools(
        &self,
        tools: &[ExternalTool],
        force: bool,
        compiler: &str,
        mut progress_callback: impl FnMut(DataProgress),
    ) -> Result<Vec<PathBuf>> {
        let tools_dir = self.tools_dir();
        fs::create_dir_all(&tools_dir)?;
        info!("Installing {} tool(s) into {:?}", tools.len(), &tools_dir);

        let client = reqwest::Client::new();
        let mut installed = Vec::with_capacity(tools.len());

        for &tool in tools {
            let binary = self.tool_path(tool);
            if binary.is_file() && !force {
                info!("{} already present at {:?}; skipping.", tool, &binary);
                progress_callback(DataProgress::Skipped { tool });
                installed.push(binary);
                continue;
            }

            info!("Sending request to {}", tool.source_url());
            let response = client
                .get(tool.source_url())
                .send()
                .await?
                .error_for_status()?;

            let total_size = response.content_length();
            progress_callback(DataProgress::DownloadStarted { tool, total_size });

            let mut downloaded: u64 = 0;
            let mut stream = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::with_capacity(total_size.unwrap_or(0) as usize);

            while let Some(item) = stream.next().await {
                let chunk = item?;
                buffer.extend_from_slice(&chunk);
                downloaded += chunk.len() as u64;
                progress_callback(DataProgress::Downloading { downloaded });
            }

            fs::write(tools_dir.join(tool.source_file_name()), &buffer)?;

            progress_callback(DataProgress::Compiling { tool });
            let path = tokio::task::block_in_place(|| compile_tool(tool, &tools_dir, compiler))?;

            info!("{} installed at {:?}", tool, &path);
            progress_callback(DataProgress::Installed {
                tool,
                path: path.clone(),
            });
            installed.push(path);
        }

        Ok(installed)
    }

    /// Persists `path` as the data directory for later runs.
    pub fn set_custom_path(path: &Path) -> Result<()> {
        let path_str = path.to_str().ok_or_else(|| {
            CliError::Argument(format!("Path is not valid UTF-8: {}", path.display()))
        })?;
        let path_conf = Self::path_conf()?;
        if let Some(parent) = path_conf.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path_conf, path_str)?;
        debug!("Wrote data path override to {:?}", &path_conf);
        Ok(())
    }

    /// Forgets a persisted data directory. Succeeds when none was set.
    pub fn reset_path() -> Result<()> {
        let path_conf = Self::path_conf()?;
        match fs::remove_file(&path_conf) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn determine_data_path() -> Result<PathBuf> {
        let dirs = project_dirs()?;
        let persisted = match fs::read_to_string(Self::path_conf()?) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        Ok(resolve_data_path(
            std::env::var(DATA_DIR_ENV).ok().as_deref(),
            persisted.as_deref(),
            dirs.data_dir(),
        ))
    }

    fn path_conf() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("path.conf"))
    }
}

/// Environment variable that overrides every other data directory setting.
pub const DATA_DIR_ENV: &str = "PLMBENCH_DATA_DIR";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "plmbench", "plmbench").ok_or_else(|| {
        CliError::Data("Could not determine the platform's data and config directories.".to_string())
    })
}

/// Picks the data directory: the environment override, then the `path.conf` contents,
/// then the platform default. Blank values count as unset.
fn resolve_data_path(env_value: Option<&str>, persisted: Option<&str>, default: &Path) -> PathBuf {
    fn non_blank(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    if let Some(dir) = non_blank(env_value) {
        return PathBuf::from(dir);
    }
    match non_blank(persisted) {
        Some(dir) => PathBuf::from(dir),
        None => {
            if persisted.is_some() {
                warn!("path.conf is empty; using the default data directory.");
            }
            default.to_path_buf()
        }
    }
}
