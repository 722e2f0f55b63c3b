use crate::cli::{DataArgs, DataCommands, ToolArg};
use crate::data::{DataManager, DataProgress};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use indicatif::{ProgressBar, ProgressDrawTarget};
use plmbench::align::ExternalTool;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub async fn run(args: DataArgs) -> Result<()> {
    match args.command {
        DataCommands::Path => {
            handle_path()?;
        }
        DataCommands::SetPath { path } => {
            handle_set_path(path)?;
        }
        DataCommands::ResetPath => {
            handle_reset_path()?;
        }
        DataCommands::InstallTools {
            force,
            tool,
            compiler,
        } => {
            handle_install_tools(force, tool, &compiler).await?;
        }
    }
    Ok(())
}

fn handle_path() -> Result<()> {
    let manager = DataManager::new()?;
    println!("{}", manager.get_data_path().display());
    Ok(())
}

fn handle_set_path(path: PathBuf) -> Result<()> {
    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()?.join(path)
    };
    DataManager::set_custom_path(&path)?;
    info!("Data path set to {:?}", &path);
    println!("Data path set to: {}", path.display());
    Ok(())
}

fn handle_reset_path() -> Result<()> {
    DataManager::reset_path()?;
    let manager = DataManager::new()?;
    println!(
        "Data path reset to default: {}",
        manager.get_data_path().display()
    );
    Ok(())
}

async fn handle_install_tools(force: bool, tool: Option<ToolArg>, compiler: &str) -> Result<()> {
    let manager = DataManager::new()?;
    let tools: Vec<ExternalTool> = match tool {
        Some(tool) => vec![tool.into()],
        None => ExternalTool::ALL.to_vec(),
    };

    let pb = ProgressBar::new(0);
    pb.set_style(CliProgressHandler::download_style());
    pb.set_draw_target(ProgressDrawTarget::stderr_with_hz(2));

    println!(
        "Installing alignment tools into: {}",
        manager.tools_dir().display()
    );

    let progress_callback = |progress: DataProgress| match progress {
        DataProgress::DownloadStarted { tool, total_size } => {
            pb.reset();
            pb.set_style(CliProgressHandler::download_style());
            pb.set_length(total_size.unwrap_or(0));
            pb.set_message(format!("Downloading {}...", tool));
        }
        DataProgress::Downloading { downloaded } => {
            pb.set_position(downloaded);
        }
        DataProgress::Compiling { tool } => {
            pb.set_style(CliProgressHandler::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(80));
            pb.set_message(format!("Compiling {}...", tool));
        }
        DataProgress::Installed { tool, path } => {
            pb.disable_steady_tick();
            pb.println(format!("✓ {} installed at {}", tool, path.display()));
        }
        DataProgress::Skipped { tool } => {
            pb.println(format!("• {} already installed (use --force to rebuild)", tool));
        }
    };

    match manager
        .install_tools(&tools, force, compiler, progress_callback)
        .await
    {
        Ok(_) => {
            pb.finish_and_clear();
            Ok(())
        }
        Err(e) => {
            pb.finish_with_message("✗ Installation failed.");
            Err(e)
        }
    }
}
