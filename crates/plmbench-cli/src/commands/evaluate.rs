use super::compare::{native_metrics, print_alignment, print_native};
use crate::cli::EvaluateArgs;
use crate::config::{AppConfig, ViewSettings};
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::remote::forge::ForgeModel;
use crate::remote::http_client;
use plmbench::align::{Comparator, ProteinAlignment};
use plmbench::datasets::casp::DEFAULT_CASP_TABLE;
use plmbench::datasets::{CaspRecord, Dataset, DatasetError, DatasetRecord, ThermoMutRecord};
use plmbench::model::{
    GenerationOptions, PredictionTask, ProteinInput, ProteinLanguageModel, ReturnType,
};
use plmbench::view::MoleculeColor;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// A dataset entry reduced to what an evaluation needs.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EvaluationTarget {
    pub pdb_id: String,
    pub sequence: String,
    pub reference_pdb: String,
}

impl EvaluationTarget {
    fn from_record(record: &impl DatasetRecord) -> Result<Self> {
        let reference_pdb = record.reference_pdb().ok_or_else(|| {
            CliError::Data(format!(
                "Entry {} has no reference structure to compare against",
                record.pdb_id()
            ))
        })?;
        Ok(Self {
            pdb_id: record.pdb_id().to_string(),
            sequence: record.real_fasta().trim().to_string(),
            reference_pdb: reference_pdb.to_string(),
        })
    }
}

/// Loads entry `index` of a CASP table, falling back to a ThermoMutDB table.
pub(crate) fn load_target(path: &Path, index: usize) -> Result<EvaluationTarget> {
    match Dataset::<CaspRecord>::load(path) {
        Ok(dataset) => EvaluationTarget::from_record(dataset.get(index)?),
        Err(err @ (DatasetError::UnsupportedFormat { .. } | DatasetError::Io(_))) => {
            Err(err.into())
        }
        Err(casp_err) => match Dataset::<ThermoMutRecord>::load(path) {
            Ok(dataset) => EvaluationTarget::from_record(dataset.get(index)?),
            Err(_) => Err(casp_err.into()),
        },
    }
}

/// Predicts the structure of `target`'s sequence with `model` and returns it as PDB text.
pub(crate) async fn predict_structure<M: ProteinLanguageModel>(
    model: &M,
    target: &EvaluationTarget,
    options: &GenerationOptions,
) -> Result<String> {
    if target.sequence.is_empty() {
        return Err(CliError::Data(format!(
            "Entry {} has an empty sequence",
            target.pdb_id
        )));
    }
    let prediction = model
        .predict(
            PredictionTask::StructurePrediction,
            ProteinInput::Sequence(target.sequence.clone()),
            ReturnType::String,
            options,
        )
        .await?;
    Ok(prediction.into_text()?)
}

pub async fn run(args: EvaluateArgs, config: &AppConfig) -> Result<()> {
    let manager = DataManager::new()?;
    let dataset_path = args
        .dataset
        .clone()
        .unwrap_or_else(|| manager.table_path(DEFAULT_CASP_TABLE));
    if !dataset_path.exists() {
        return Err(CliError::Data(format!(
            "No dataset table at '{}'. Build one with `plmbench dataset casp` first.",
            dataset_path.display()
        )));
    }

    let target = load_target(&dataset_path, args.index)?;
    println!(
        "Evaluating entry #{} ({}, {} residues)",
        args.index,
        target.pdb_id,
        target.sequence.chars().count()
    );

    let comparator = Comparator::new(
        config.comparison.method,
        config.comparison.options.clone(),
        config.comparison.locator(&manager.tools_dir()),
    );
    comparator.check_tools()?;

    let model = ForgeModel::from_settings(http_client()?, &config.model)?;
    let predicted = predict_structure(&model, &target, &config.model.generation_options()).await?;
    info!("Predicted structure for {} received", target.pdb_id);

    let alignments = tokio::task::block_in_place(|| {
        comparator.compare(&predicted, &target.reference_pdb)
    })?;
    println!("\nPrediction onto reference:");
    for alignment in &alignments {
        print_alignment(alignment);
    }

    if args.both_directions {
        let reverse = tokio::task::block_in_place(|| {
            comparator.compare(&target.reference_pdb, &predicted)
        })?;
        println!("\nReference onto prediction:");
        for alignment in &reverse {
            print_alignment(alignment);
        }
    }

    match native_metrics(&predicted, &target.reference_pdb) {
        Ok(metrics) => {
            println!();
            print_native(&metrics);
        }
        Err(e) => warn!("Native metrics unavailable for {}: {}", target.pdb_id, e),
    }

    if let Some(dir) = &args.view {
        write_views(dir, &target, &predicted, &alignments, &config.view)?;
        println!("\n✓ Prediction and viewers written to: {}", dir.display());
    }
    Ok(())
}

/// Writes the prediction and one viewer page per alignment tool into `dir`.
fn write_views(
    dir: &Path,
    target: &EvaluationTarget,
    predicted: &str,
    alignments: &[ProteinAlignment],
    settings: &ViewSettings,
) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(format!("{}_predicted.pdb", target.pdb_id)), predicted)?;

    let mut view = settings.new_view();
    for alignment in alignments {
        let path = dir.join(format!(
            "{}_{}.html",
            target.pdb_id,
            alignment.method.binary_name()
        ));
        view.add_molecule(alignment.pdb1.as_str(), MoleculeColor::Red)
            .add_molecule(alignment.pdb2.as_str(), MoleculeColor::Blue)
            .save_html(&path)?;
        view.reset();
    }
    Ok(())
}
