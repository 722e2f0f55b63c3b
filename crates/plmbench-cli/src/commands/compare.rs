use crate::cli::CompareArgs;
use crate::config::AppConfig;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use plmbench::align::{Comparator, ProteinAlignment};
use plmbench::core::io::pdb::PdbFile;
use plmbench::core::io::traits::StructureFile;
use plmbench::core::metrics::{ResiduePairing, StructuralMetrics};
use plmbench::view::MoleculeColor;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Serialize)]
struct ComparisonReport<'a> {
    alignments: &'a [ProteinAlignment],
    #[serde(skip_serializing_if = "Option::is_none")]
    native: Option<&'a StructuralMetrics>,
}

pub async fn run(args: CompareArgs, config: &AppConfig) -> Result<()> {
    let pdb1 = read_pdb(&args.pdb1)?;
    let pdb2 = read_pdb(&args.pdb2)?;

    let manager = DataManager::new()?;
    let comparator = Comparator::new(
        config.comparison.method,
        config.comparison.options.clone(),
        config.comparison.locator(&manager.tools_dir()),
    );

    info!(
        "Comparing {:?} against {:?} with {:?}",
        &args.pdb1, &args.pdb2, config.comparison.method
    );
    let alignments = tokio::task::block_in_place(|| comparator.compare(&pdb1, &pdb2))?;

    let native = if args.native {
        Some(native_metrics(&pdb1, &pdb2)?)
    } else {
        None
    };

    if args.json {
        let report = ComparisonReport {
            alignments: &alignments,
            native: native.as_ref(),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::Other(e.into()))?;
        println!("{}", json);
    } else {
        for alignment in &alignments {
            print_alignment(alignment);
        }
        if let Some(metrics) = &native {
            print_native(metrics);
        }
    }

    if let Some(dir) = &args.superimposed {
        for path in write_superimposed(&alignments, dir)? {
            println!("✓ Superimposed structure written to: {}", path.display());
        }
    }

    if let Some(path) = &args.view {
        config
            .view
            .new_view()
            .add_molecule(pdb1.as_str(), MoleculeColor::Red)
            .add_molecule(pdb2.as_str(), MoleculeColor::Blue)
            .save_html(path)?;
        println!("✓ Viewer written to: {}", path.display());
    }

    Ok(())
}

pub(crate) fn read_pdb(path: &Path) -> Result<String> {
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Err(CliError::Argument(format!(
            "'{}' is empty",
            path.display()
        )));
    }
    Ok(contents)
}

/// Residue-paired RMSD, lDDT and TM-score of `model` against `reference`.
pub(crate) fn native_metrics(model: &str, reference: &str) -> Result<StructuralMetrics> {
    let model = PdbFile::read_from_str(model)?;
    let reference = PdbFile::read_from_str(reference)?;
    Ok(StructuralMetrics::compare(
        &model,
        &reference,
        ResiduePairing::Auto,
    )?)
}

pub(crate) fn print_alignment(alignment: &ProteinAlignment) {
    println!("{}:", alignment.method);
    println!("  TM-score (normalized by structure 1): {:.4}", alignment.score1);
    println!("  TM-score (normalized by structure 2): {:.4}", alignment.score2);
    if let Some(score) = alignment.final_score {
        println!("  TM-score (normalized by average length): {:.4}", score);
    }
    if let Some(length) = alignment.aligned_length {
        println!("  Aligned length: {}", length);
    }
    if let Some(rmsd) = alignment.rmsd {
        println!("  RMSD: {:.2}", rmsd);
    }
    if let Some(identity) = alignment.sequence_identity {
        println!("  Sequence identity: {:.3}", identity);
    }
}

pub(crate) fn print_native(metrics: &StructuralMetrics) {
    println!("Native metrics over {} paired residue(s):", metrics.aligned_residues);
    println!("  RMSD: {:.3}", metrics.rmsd);
    println!("  lDDT: {:.4}", metrics.lddt);
    println!("  TM-score: {:.4}", metrics.tm_score);
}

/// Writes each superposition as `<tool>_superimposed.pdb` inside `dir`.
pub(crate) fn write_superimposed(
    alignments: &[ProteinAlignment],
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();
    for alignment in alignments {
        let Some(pdb) = &alignment.superimposed_pdb else {
            continue;
        };
        let path = dir.join(format!("{}_superimposed.pdb", alignment.method.binary_name()));
        fs::write(&path, pdb)?;
        written.push(path);
    }
    Ok(written)
}
