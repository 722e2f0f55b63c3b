use super::error::AlignError;
use super::method::ExternalTool;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

/// Compiles `<dir>/<binary>.cpp` into `<dir>/<binary>` with the given C++ compiler.
///
/// The source must already be present; fetching it is left to the caller.
pub fn compile_tool(tool: ExternalTool, dir: &Path, compiler: &str) -> Result<PathBuf, AlignError> {
    let source = dir.join(tool.source_file_name());
    if !source.is_file() {
        return Err(AlignError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Source file not found: {}", source.display()),
        )));
    }

    info!("Compiling {} with {}", tool, compiler);
    let output = Command::new(compiler)
        .args(tool.compile_args())
        .current_dir(dir)
        .output()?;

    if !output.status.success() {
        return Err(AlignError::CompileFailed {
            tool,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(dir.join(tool.binary_name()))
}
