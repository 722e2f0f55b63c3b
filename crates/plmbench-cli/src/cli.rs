use clap::{Args, Parser, Subcommand, ValueEnum};
use plmbench::align::{AlignmentMethod, ExternalTool};
use plmbench::datasets::CaspVersion;
use plmbench::datasets::thermomutdb::DEFAULT_MUTATION_MANIFEST;
use plmbench::model::PredictionTask;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "plmbench - evaluate protein language models against CASP and ThermoMutDB reference structures with TM-align, US-align and native structural metrics.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S model.num-steps=1
    #[arg(short = 'S', long = "set", global = true, value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the local data directory and the external alignment tools.
    Data(DataArgs),
    /// Build or inspect reference dataset tables.
    Dataset(DatasetArgs),
    /// Run one prediction with the protein language model.
    Predict(PredictArgs),
    /// Score two PDB structures against each other.
    Compare(CompareArgs),
    /// Predict the structure of a dataset record and score it against the reference.
    Evaluate(EvaluateArgs),
    /// Download one structure from the RCSB PDB.
    Rcsb(RcsbArgs),
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommands,
}

#[derive(Subcommand, Debug)]
pub enum DataCommands {
    /// Show the absolute path to the local data directory.
    Path,
    /// Set a custom absolute path for the local data directory.
    SetPath {
        /// The new path to use for storing data files.
        #[arg(required = true)]
        path: PathBuf,
    },
    /// Reset the data path to its default, OS-specific location.
    ResetPath,
    /// Download and compile TM-align and US-align into the data directory.
    InstallTools {
        /// Rebuild tools that are already installed.
        #[arg(long)]
        force: bool,
        /// Install only this tool.
        #[arg(long, value_enum)]
        tool: Option<ToolArg>,
        /// C++ compiler used to build the tools.
        #[arg(long, default_value = "g++", value_name = "CXX")]
        compiler: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolArg {
    TmAlign,
    UsAlign,
}

impl From<ToolArg> for ExternalTool {
    fn from(arg: ToolArg) -> Self {
        match arg {
            ToolArg::TmAlign => ExternalTool::TmAlign,
            ToolArg::UsAlign => ExternalTool::UsAlign,
        }
    }
}

/// Arguments for the `dataset` subcommand.
#[derive(Args, Debug)]
pub struct DatasetArgs {
    #[command(subcommand)]
    pub command: DatasetCommands,
}

#[derive(Subcommand, Debug)]
pub enum DatasetCommands {
    /// Build the CASP table from the CASP-Datasets repository and RCSB.
    #[command(disable_version_flag = true)]
    Casp {
        /// CASP round to build (CASP10 to CASP14, or COMBINED for all of them).
        #[arg(long, default_value = "COMBINED", value_parser = parse_casp_version)]
        version: CaspVersion,
        /// Output table (.json or .csv). Defaults to the data directory.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Keep the cloned repository in this directory instead of a temporary one.
        #[arg(long, value_name = "DIR")]
        keep_clone: Option<PathBuf>,
    },
    /// Build the ThermoMutDB table from a mutation manifest.
    Thermomutdb {
        /// CSV manifest with `id`, `UNIPROT` and `MUTATION_uniprot` columns.
        #[arg(long, value_name = "PATH", default_value = DEFAULT_MUTATION_MANIFEST)]
        manifest: PathBuf,
        /// Output table (.json or .csv). Defaults to the data directory.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Print a summary of a saved table.
    Show {
        /// Table file (.json or .csv).
        path: PathBuf,
        /// Print this record in detail.
        #[arg(long, value_name = "N")]
        index: Option<usize>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskArg {
    Masked,
    Structure,
    Inverse,
}

impl From<TaskArg> for PredictionTask {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Masked => PredictionTask::MaskedSequenceCompletion,
            TaskArg::Structure => PredictionTask::StructurePrediction,
            TaskArg::Inverse => PredictionTask::InverseFolding,
        }
    }
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Prediction task to run.
    #[arg(short, long, value_enum)]
    pub task: TaskArg,

    /// Input sequence; use '_' for masked positions.
    #[arg(short, long, conflicts_with = "input", required_unless_present = "input")]
    pub sequence: Option<String>,

    /// Input file: FASTA for sequence tasks, PDB for inverse folding.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Write the prediction here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Override the number of generation steps.
    #[arg(long, value_name = "INT")]
    pub num_steps: Option<usize>,

    /// Override the sampling temperature.
    #[arg(long, value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Reference sequence to report recovery against.
    #[arg(long, value_name = "SEQ")]
    pub reference: Option<String>,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// First structure (PDB).
    pub pdb1: PathBuf,

    /// Second structure (PDB).
    pub pdb2: PathBuf,

    /// Override the alignment method (us-align, tm-align or all).
    #[arg(short, long, value_parser = parse_method)]
    pub method: Option<AlignmentMethod>,

    /// Save each tool's superimposed structure into this directory.
    #[arg(long, value_name = "DIR")]
    pub superimposed: Option<PathBuf>,

    /// Write a 3Dmol.js viewer page of both structures.
    #[arg(long, value_name = "HTML")]
    pub view: Option<PathBuf>,

    /// Also report native RMSD, lDDT and TM-score over residue-paired Cα atoms.
    #[arg(long)]
    pub native: bool,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// CASP table (.json or .csv) built by `dataset casp`.
    #[arg(short, long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Record to evaluate.
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub index: usize,

    /// Override the alignment method (us-align, tm-align or all).
    #[arg(short, long, value_parser = parse_method)]
    pub method: Option<AlignmentMethod>,

    /// Write viewer pages into this directory.
    #[arg(long, value_name = "DIR")]
    pub view: Option<PathBuf>,

    /// Also align the reference onto the prediction.
    #[arg(long)]
    pub both_directions: bool,

    /// Override the number of generation steps.
    #[arg(long, value_name = "INT")]
    pub num_steps: Option<usize>,

    /// Override the sampling temperature.
    #[arg(long, value_name = "FLOAT")]
    pub temperature: Option<f64>,
}

/// Arguments for the `rcsb` subcommand.
#[derive(Args, Debug)]
pub struct RcsbArgs {
    /// Four-character PDB identifier.
    pub pdb_id: String,

    /// Write the structure here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

fn parse_method(s: &str) -> Result<AlignmentMethod, String> {
    s.parse::<AlignmentMethod>().map_err(|e| e.to_string())
}

fn parse_casp_version(s: &str) -> Result<CaspVersion, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let cli = Cli::try_parse_from([
            "plmbench", "compare", "a.pdb", "b.pdb", "-vv", "-S", "view.width=800", "--method",
            "all",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.set_values, vec!["view.width=800"]);
        let Commands::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.method, Some(AlignmentMethod::All));
    }

    #[test]
    fn thermomutdb_manifest_defaults_to_the_bundled_csv() {
        let cli = Cli::try_parse_from(["plmbench", "dataset", "thermomutdb"]).unwrap();
        let Commands::Dataset(DatasetArgs {
            command: DatasetCommands::Thermomutdb { manifest, output },
        }) = cli.command
        else {
            panic!("expected dataset thermomutdb");
        };
        assert_eq!(manifest, PathBuf::from(DEFAULT_MUTATION_MANIFEST));
        assert!(output.is_none());
    }

    #[test]
    fn predict_requires_sequence_or_input() {
        assert!(Cli::try_parse_from(["plmbench", "predict", "--task", "structure"]).is_err());
        assert!(
            Cli::try_parse_from([
                "plmbench", "predict", "--task", "masked", "--sequence", "MK_", "--input", "a.fa"
            ])
            .is_err()
        );
        let cli =
            Cli::try_parse_from(["plmbench", "predict", "--task", "inverse", "-i", "x.pdb"])
                .unwrap();
        let Commands::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(PredictionTask::from(args.task), PredictionTask::InverseFolding);
    }

    #[test]
    fn casp_version_defaults_to_combined() {
        let cli = Cli::try_parse_from(["plmbench", "dataset", "casp"]).unwrap();
        let Commands::Dataset(DatasetArgs {
            command: DatasetCommands::Casp { version, .. },
        }) = cli.command
        else {
            panic!("expected dataset casp");
        };
        assert_eq!(version, CaspVersion::Combined);
    }
}
