use super::method::ExternalTool;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("{tool} executable not found (searched: {searched:?}). Hint: run 'plmbench data install-tools'.")]
    ToolNotFound {
        tool: ExternalTool,
        searched: Vec<PathBuf>,
    },

    #[error("I/O error while running aligner: {0}")]
    Io(#[from] io::Error),

    #[error("{tool} exited with status {status:?}: {stderr}")]
    ToolFailed {
        tool: ExternalTool,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{tool} output contained {found} TM-score value(s), expected at least 2")]
    MissingScores {
        tool: ExternalTool,
        found: usize,
        output: String,
    },

    #[error("Failed to compile {tool}: {stderr}")]
    CompileFailed { tool: ExternalTool, stderr: String },
}
