mod cli;
mod commands;
mod config;
mod data;
mod error;
mod logging;
mod remote;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::{CliOverrides, build_config};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn overrides_for(command: &Commands) -> CliOverrides {
    match command {
        Commands::Predict(args) => CliOverrides {
            method: None,
            num_steps: args.num_steps,
            temperature: args.temperature,
        },
        Commands::Compare(args) => CliOverrides {
            method: args.method,
            ..CliOverrides::default()
        },
        Commands::Evaluate(args) => CliOverrides {
            method: args.method,
            num_steps: args.num_steps,
            temperature: args.temperature,
        },
        Commands::Data(_) | Commands::Dataset(_) | Commands::Rcsb(_) => CliOverrides::default(),
    }
}

async fn run_app() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    match dotenv {
        Ok(path) => debug!("Loaded environment from {:?}", path),
        Err(e) if e.not_found() => debug!("No .env file found."),
        Err(e) => return Err(CliError::Config(format!("Failed to read .env file: {}", e))),
    }

    let command_result = async {
        info!("🚀 plmbench v{} starting up.", env!("CARGO_PKG_VERSION"));
        debug!("Full CLI arguments parsed: {:?}", &cli);

        let overrides = overrides_for(&cli.command);
        let config = build_config(cli.config.as_deref(), &cli.set_values, &overrides)?;
        debug!("Resolved configuration: {:?}", &config);

        match cli.command {
            Commands::Data(args) => {
                info!("Dispatching to 'data' command.");
                commands::data::run(args).await
            }
            Commands::Dataset(args) => {
                info!("Dispatching to 'dataset' command.");
                commands::dataset::run(args, &config).await
            }
            Commands::Predict(args) => {
                info!("Dispatching to 'predict' command.");
                commands::predict::run(args, &config).await
            }
            Commands::Compare(args) => {
                info!("Dispatching to 'compare' command.");
                commands::compare::run(args, &config).await
            }
            Commands::Evaluate(args) => {
                info!("Dispatching to 'evaluate' command.");
                commands::evaluate::run(args, &config).await
            }
            Commands::Rcsb(args) => {
                info!("Dispatching to 'rcsb' command.");
                commands::rcsb::run(args, &config).await
            }
        }
    }
    .await;

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
        }
    }

    command_result
}
