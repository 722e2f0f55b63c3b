use super::error::AlignError;
use super::locator::ToolLocator;
use super::method::{AlignerOptions, AlignmentMethod, ExternalTool};
use super::parser::parse_alignment_output;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, info, warn};

const SUPERIMPOSED_PREFIX: &str = "superimposed";

/// The outcome of aligning one structure onto another with an external tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProteinAlignment {
    pub method: ExternalTool,
    pub pdb1: String,
    pub pdb2: String,
    /// Structure 1 superimposed onto structure 2, when the tool wrote one.
    pub superimposed_pdb: Option<String>,
    /// TM-score normalized by the length of structure 1.
    pub score1: f64,
    /// TM-score normalized by the length of structure 2.
    pub score2: f64,
    /// TM-score normalized by the average length, present when requested with `-a T`.
    pub final_score: Option<f64>,
    pub aligned_length: Option<usize>,
    pub rmsd: Option<f64>,
    pub sequence_identity: Option<f64>,
    /// Raw stdout of the tool.
    pub auxiliary: Option<String>,
}

/// Scores pairs of structures with TM-align and/or US-align.
#[derive(Debug, Clone)]
pub struct Comparator {
    method: AlignmentMethod,
    options: AlignerOptions,
    locator: ToolLocator,
}

impl Comparator {
    pub fn new(method: AlignmentMethod, options: AlignerOptions, locator: ToolLocator) -> Self {
        Self {
            method,
            options,
            locator,
        }
    }

    pub fn method(&self) -> AlignmentMethod {
        self.method
    }

    /// Verifies every tool the configured method needs can be found.
    pub fn check_tools(&self) -> Result<Vec<PathBuf>, AlignError> {
        self.method
            .tools()
            .iter()
            .map(|tool| self.locator.locate(*tool))
            .collect()
    }

    /// Aligns `pdb1` onto `pdb2` with every tool of the configured method, in order.
    pub fn compare(&self, pdb1: &str, pdb2: &str) -> Result<Vec<ProteinAlignment>, AlignError> {
        self.method
            .tools()
            .iter()
            .map(|tool| self.run_tool(*tool, pdb1, pdb2))
            .collect()
    }

    /// Runs a single tool on two in-memory PDB documents.
    ///
    /// Both inputs are written to named temporary files and the tool is pointed at a
    /// scratch directory for its superposition output; all of it is removed when this
    /// returns.
    pub fn run_tool(
        &self,
        tool: ExternalTool,
        pdb1: &str,
        pdb2: &str,
    ) -> Result<ProteinAlignment, AlignError> {
        let executable = self.locator.locate(tool)?;

        let first = write_temporary_pdb(pdb1)?;
        let second = write_temporary_pdb(pdb2)?;
        let scratch = TempDir::new()?;
        let output_prefix = scratch.path().join(SUPERIMPOSED_PREFIX);

        let mut command = Command::new(&executable);
        command
            .args(self.options.to_args())
            .arg(first.path())
            .arg(second.path())
            .arg("-o")
            .arg(&output_prefix);

        info!("Running {} on {:?} and {:?}", tool, first.path(), second.path());
        debug!("Command: {:?}", &command);

        let output = command.output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            return Err(AlignError::ToolFailed {
                tool,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let report = parse_alignment_output(&stdout);
        let (Some(score1), Some(score2)) = (report.score1(), report.score2()) else {
            return Err(AlignError::MissingScores {
                tool,
                found: report.tm_scores.len(),
                output: stdout,
            });
        };

        let superimposed_pdb = read_superposition(&output_prefix)?;
        if superimposed_pdb.is_none() {
            warn!("{} did not write a superposition file", tool);
        }

        Ok(ProteinAlignment {
            method: tool,
            pdb1: pdb1.to_string(),
            pdb2: pdb2.to_string(),
            superimposed_pdb,
            score1,
            score2,
            final_score: report.average_length_score(),
            aligned_length: report.aligned_length,
            rmsd: report.rmsd,
            sequence_identity: report.sequence_identity,
            auxiliary: Some(stdout),
        })
    }
}

fn write_temporary_pdb(contents: &str) -> Result<NamedTempFile, AlignError> {
    let mut file = tempfile::Builder::new().suffix(".pdb").tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Reads the superposition written under `prefix`, trying the bare name before the name
/// with a `.pdb` extension.
fn read_superposition(prefix: &Path) -> Result<Option<String>, AlignError> {
    let with_extension = prefix.with_extension("pdb");
    for candidate in [prefix.to_path_buf(), with_extension] {
        if candidate.is_file() {
            return Ok(Some(fs::read_to_string(&candidate)?));
        }
    }
    Ok(None)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    fn install_fake_tool(dir: &Path, name: &str, script: &str) {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    const FAKE_ALIGNER: &str = r#"
# Arguments: -mm 1 -ter 0 <pdb1> <pdb2> -o <prefix>
grep -q ATOM "$5" || exit 3
grep -q ATOM "$6" || exit 3
echo "REMARK superposition" > "$8.pdb"
echo "Aligned length=   12, RMSD=   0.53, Seq_ID=n_identical/n_aligned= 0.750"
echo "TM-score= 0.91000 (if normalized by length of Chain_1, i.e., LN=12, d0=0.50)"
echo "TM-score= 0.87000 (if normalized by length of Chain_2, i.e., LN=13, d0=0.50)"
"#;

    const PDB: &str =
        "ATOM      1  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C\n";

    fn comparator_in(dir: &Path, method: AlignmentMethod) -> Comparator {
        Comparator::new(
            method,
            AlignerOptions::default(),
            ToolLocator::new().without_system_path().with_search_dir(dir),
        )
    }

    #[test]
    fn compare_parses_scores_and_reads_superposition() {
        let dir = tempdir().unwrap();
        install_fake_tool(dir.path(), "USalign", FAKE_ALIGNER);

        let results = comparator_in(dir.path(), AlignmentMethod::UsAlign)
            .compare(PDB, PDB)
            .unwrap();

        assert_eq!(results.len(), 1);
        let alignment = &results[0];
        assert_eq!(alignment.method, ExternalTool::UsAlign);
        assert_eq!(alignment.score1, 0.91);
        assert_eq!(alignment.score2, 0.87);
        assert_eq!(alignment.final_score, None);
        assert_eq!(alignment.aligned_length, Some(12));
        assert_eq!(alignment.rmsd, Some(0.53));
        assert_eq!(
            alignment.superimposed_pdb.as_deref(),
            Some("REMARK superposition\n")
        );
        assert!(alignment.auxiliary.as_deref().unwrap().contains("TM-score="));
        assert_eq!(alignment.pdb1, PDB);
    }

    #[test]
    fn all_method_runs_both_tools_in_order() {
        let dir = tempdir().unwrap();
        install_fake_tool(dir.path(), "USalign", FAKE_ALIGNER);
        install_fake_tool(dir.path(), "TMalign", FAKE_ALIGNER);

        let comparator = comparator_in(dir.path(), AlignmentMethod::All);
        assert_eq!(comparator.check_tools().unwrap().len(), 2);

        let methods: Vec<ExternalTool> = comparator
            .compare(PDB, PDB)
            .unwrap()
            .iter()
            .map(|a| a.method)
            .collect();
        assert_eq!(methods, vec![ExternalTool::TmAlign, ExternalTool::UsAlign]);
    }

    #[test]
    fn output_without_scores_is_an_error_not_a_panic() {
        let dir = tempdir().unwrap();
        install_fake_tool(dir.path(), "TMalign", "echo 'TM-score= 0.4'\n");

        let result = comparator_in(dir.path(), AlignmentMethod::TmAlign).compare(PDB, PDB);
        match result {
            Err(AlignError::MissingScores { found, output, .. }) => {
                assert_eq!(found, 1);
                assert!(output.contains("0.4"));
            }
            other => panic!("Expected MissingScores, got {:?}", other),
        }
    }

    #[test]
    fn failing_tool_reports_exit_status_and_stderr() {
        let dir = tempdir().unwrap();
        install_fake_tool(dir.path(), "TMalign", "echo 'cannot read' >&2\nexit 2\n");

        let result = comparator_in(dir.path(), AlignmentMethod::TmAlign).compare(PDB, PDB);
        match result {
            Err(AlignError::ToolFailed { status, stderr, .. }) => {
                assert_eq!(status, Some(2));
                assert_eq!(stderr, "cannot read");
            }
            other => panic!("Expected ToolFailed, got {:?}", other),
        }
    }

    #[test]
    fn missing_tool_is_reported_before_running() {
        let dir = tempdir().unwrap();
        let result = comparator_in(dir.path(), AlignmentMethod::UsAlign).compare(PDB, PDB);
        assert!(matches!(result, Err(AlignError::ToolNotFound { .. })));
    }
}
