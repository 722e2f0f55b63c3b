use crate::error::{CliError, Result};
use std::fs::File;
use std::path::Path;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Extra filter directives, e.g. `PLMBENCH_LOG=plmbench=trace,reqwest=debug`.
pub const LOG_ENV: &str = "PLMBENCH_LOG";

pub fn level_for(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Builds the filter: the `-v`/`-q` level as the default, refined by [`LOG_ENV`]
/// directives when present.
pub fn build_filter(verbosity: u8, quiet: bool, directives: Option<&str>) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(level_for(verbosity, quiet).into());
    match directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) if !quiet => builder.parse_lossy(directives),
        _ => builder.parse_lossy(""),
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = build_filter(verbosity, quiet, std::env::var(LOG_ENV).ok().as_deref());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_writer(File::create(path)?)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_target(true),
        ),
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}
