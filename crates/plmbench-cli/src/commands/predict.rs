use crate::cli::PredictArgs;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use crate::remote::forge::ForgeModel;
use crate::remote::http_client;
use plmbench::core::io::fasta;
use plmbench::model::sequence::{count_masked, masked_recovery, recovery};
use plmbench::model::{PredictionTask, ProteinInput, ProteinLanguageModel, ReturnType};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

pub async fn run(args: PredictArgs, config: &AppConfig) -> Result<()> {
    let task = PredictionTask::from(args.task);
    let text = prediction_text(task, args.sequence.as_deref(), args.input.as_deref())?;
    debug!("Prediction input is {} character(s)", text.len());

    let model = ForgeModel::from_settings(http_client()?, &config.model)?;
    let options = config.model.generation_options();

    println!("Running {} with {}...", task, model.model_id());
    let prediction = model
        .predict(
            task,
            ProteinInput::from_text(task, text.clone()),
            ReturnType::String,
            &options,
        )
        .await?;
    let output = prediction.into_text()?;

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &output)?;
            info!("Wrote prediction to {:?}", path);
            println!("✓ Prediction written to: {}", path.display());
        }
        None => println!("{}", output),
    }

    if let Some(reference) = &args.reference {
        if task == PredictionTask::StructurePrediction {
            println!("Note: --reference only applies to sequence outputs; ignoring it.");
        } else {
            print_recovery(task, &text, &output, reference.trim())?;
        }
    }
    Ok(())
}

/// Resolves the model input from `--sequence` or `--input`. Inverse folding needs a
/// structure, so it only accepts a file.
fn prediction_text(
    task: PredictionTask,
    sequence: Option<&str>,
    input: Option<&Path>,
) -> Result<String> {
    match (sequence, input) {
        (Some(_), _) if task.takes_structure_text() => Err(CliError::Argument(format!(
            "{} takes a PDB structure; pass it with --input instead of --sequence",
            task
        ))),
        (Some(sequence), _) => Ok(sequence.trim().to_string()),
        (None, Some(path)) => read_input_file(task, path),
        (None, None) => Err(CliError::Argument(
            "either --sequence or --input is required".to_string(),
        )),
    }
}

/// Reads a prediction input file: PDB text for inverse folding, otherwise FASTA or a bare
/// sequence.
fn read_input_file(task: PredictionTask, path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path)?;
    if task.takes_structure_text() {
        return Ok(contents);
    }
    if contents.trim_start().starts_with('>') {
        fasta::first_sequence(&contents).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    } else {
        Ok(contents.split_whitespace().collect())
    }
}

fn print_recovery(task: PredictionTask, input: &str, predicted: &str, reference: &str) -> Result<()> {
    println!("Sequence recovery: {:.4}", recovery(predicted, reference)?);
    if task == PredictionTask::MaskedSequenceCompletion {
        match masked_recovery(input, predicted, reference)? {
            Some(value) => println!(
                "Masked-position recovery ({} masked): {:.4}",
                count_masked(input),
                value
            ),
            None => println!("Masked-position recovery: no masked positions"),
        }
    }
    Ok(())
}
