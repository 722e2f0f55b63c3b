use crate::cli::{DatasetArgs, DatasetCommands};
use crate::config::AppConfig;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use crate::remote::casp::clone_repository;
use crate::remote::http_client;
use crate::remote::rcsb::RcsbClient;
use crate::remote::thermomutdb::ThermoMutClient;
use crate::utils::progress::{CliProgressHandler, Progress, ProgressCallback};
use plmbench::datasets::casp::DEFAULT_CASP_TABLE;
use plmbench::datasets::thermomutdb::DEFAULT_THERMOMUTDB_TABLE;
use plmbench::datasets::{
    CaspCheckout, CaspRecord, CaspVersion, Dataset, DatasetError, DatasetRecord,
    MutationManifestRow, ThermoMutRecord, VariantInformation, read_manifest,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Where reference structures come from.
pub(crate) trait StructureSource {
    async fn fetch_pdb(&self, pdb_id: &str) -> Result<Option<String>>;
}

/// Where ThermoMutDB variant information comes from.
pub(crate) trait VariantSource {
    async fn variant_information(&self, uniprot: &str) -> Result<Value>;
}

impl StructureSource for RcsbClient {
    async fn fetch_pdb(&self, pdb_id: &str) -> Result<Option<String>> {
        self.download_pdb(pdb_id).await
    }
}

impl VariantSource for ThermoMutClient {
    async fn variant_information(&self, uniprot: &str) -> Result<Value> {
        ThermoMutClient::variant_information(self, uniprot).await
    }
}

pub async fn run(args: DatasetArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        DatasetCommands::Casp {
            version,
            output,
            keep_clone,
        } => handle_casp(version, output, keep_clone, config).await,
        DatasetCommands::Thermomutdb { manifest, output } => {
            handle_thermomutdb(&manifest, output, config).await
        }
        DatasetCommands::Show { path, index } => handle_show(&path, index),
    }
}

fn resolve_output(output: Option<PathBuf>, default_name: &str) -> Result<PathBuf> {
    match output {
        Some(path) => Ok(path),
        None => Ok(DataManager::new()?.table_path(default_name)),
    }
}

async fn handle_casp(
    version: CaspVersion,
    output: Option<PathBuf>,
    keep_clone: Option<PathBuf>,
    config: &AppConfig,
) -> Result<()> {
    let output = resolve_output(output, DEFAULT_CASP_TABLE)?;
    let rcsb = RcsbClient::new(http_client()?, config.datasets.rcsb_url.clone());
    let handler = CliProgressHandler::new();
    let callback = handler.get_callback();

    let dataset = casp_table(
        &output,
        version,
        keep_clone,
        &config.datasets.casp_repository,
        &rcsb,
        &callback,
    )
    .await?;
    println!(
        "CASP table with {} record(s) at {}",
        dataset.len(),
        output.display()
    );
    Ok(())
}

/// Loads the CASP table at `output`, or clones the dataset repository and builds it. An
/// existing checkout in `keep_clone` is reused instead of cloned again.
pub(crate) async fn casp_table(
    output: &Path,
    version: CaspVersion,
    keep_clone: Option<PathBuf>,
    repository: &str,
    structures: &impl StructureSource,
    progress: &ProgressCallback,
) -> Result<Dataset<CaspRecord>> {
    Dataset::load_or_build(output, move || async move {
        // The temporary checkout is removed when `_scratch` drops.
        let (_scratch, clone_dir) = match keep_clone {
            Some(dir) => (None, dir),
            None => {
                let scratch = tempfile::Builder::new().prefix("casp-datasets").tempdir()?;
                let dir = scratch.path().join("CASP-Datasets");
                (Some(scratch), dir)
            }
        };

        let checkout = CaspCheckout::new(&clone_dir);
        if version.expand().iter().all(|v| checkout.is_populated(*v)) {
            info!("Reusing existing checkout at {:?}", &clone_dir);
        } else {
            clone_repository(repository, &clone_dir).await?;
        }
        build_casp_dataset(&checkout, version, structures, progress).await
    })
    .await
}

/// Resolves every target of the selected rounds and attaches its RCSB structure, rounds
/// concatenated oldest first.
pub(crate) async fn build_casp_dataset(
    checkout: &CaspCheckout,
    version: CaspVersion,
    structures: &impl StructureSource,
    progress: &ProgressCallback,
) -> Result<Dataset<CaspRecord>> {
    let mut dataset = Dataset::new();

    for round in version.expand() {
        let targets = checkout.targets(round)?;
        progress(Progress::StageStart {
            name: round.folder_name().to_string(),
        });
        progress(Progress::ItemsStart {
            total: targets.len() as u64,
        });

        for target in targets {
            let real_pdb = structures.fetch_pdb(&target.pdb_id).await?;
            if real_pdb.is_none() {
                progress(Progress::Warning(format!(
                    "No structure for {} ({})",
                    target.target_id, target.pdb_id
                )));
            }
            dataset.push(target.into_record(real_pdb));
            progress(Progress::ItemDone);
        }

        progress(Progress::StageFinish);
    }

    info!("Built CASP table with {} record(s)", dataset.len());
    Ok(dataset)
}

async fn handle_thermomutdb(
    manifest: &Path,
    output: Option<PathBuf>,
    config: &AppConfig,
) -> Result<()> {
    let output = resolve_output(output, DEFAULT_THERMOMUTDB_TABLE)?;
    let client = http_client()?;
    let variants = ThermoMutClient::new(client.clone(), config.datasets.thermomutdb_url.clone());
    let rcsb = RcsbClient::new(client, config.datasets.rcsb_url.clone());
    let handler = CliProgressHandler::new();
    let callback = handler.get_callback();

    let dataset = thermomutdb_table(&output, manifest, &variants, &rcsb, &callback).await?;
    println!(
        "ThermoMutDB table with {} record(s) at {}",
        dataset.len(),
        output.display()
    );
    Ok(())
}

/// Loads the ThermoMutDB table at `output`, or builds it from the manifest.
pub(crate) async fn thermomutdb_table(
    output: &Path,
    manifest: &Path,
    variants: &impl VariantSource,
    structures: &impl StructureSource,
    progress: &ProgressCallback,
) -> Result<Dataset<ThermoMutRecord>> {
    Dataset::load_or_build(output, move || async move {
        let rows = read_manifest(manifest)?;
        progress(Progress::StageStart {
            name: "ThermoMutDB".to_string(),
        });
        let dataset =
            build_thermomutdb_dataset(&rows, variants, structures, output, progress).await?;
        progress(Progress::StageFinish);
        Ok::<_, CliError>(dataset)
    })
    .await
}

/// Queries every manifest row, keeps those with a wild-type structure and saves the
/// table to `output` after each accepted row.
pub(crate) async fn build_thermomutdb_dataset(
    rows: &[MutationManifestRow],
    variants: &impl VariantSource,
    structures: &impl StructureSource,
    output: &Path,
    progress: &ProgressCallback,
) -> Result<Dataset<ThermoMutRecord>> {
    let mut dataset = Dataset::new();
    progress(Progress::ItemsStart {
        total: rows.len() as u64,
    });

    for row in rows {
        let raw = variants.variant_information(&row.uniprot).await?;
        match VariantInformation::from_json(raw)? {
            Some(info) => {
                let real_pdb_wild = structures.fetch_pdb(&info.pdb_wild).await?;
                dataset.push(ThermoMutRecord::new(row, &info, real_pdb_wild)?);
                dataset.save(output)?;
            }
            None => {
                let message = format!(
                    "Skipping {} ({}): no wild-type structure listed",
                    row.id, row.uniprot
                );
                warn!("{}", message);
                progress(Progress::Warning(message));
            }
        }
        progress(Progress::ItemDone);
    }

    Ok(dataset)
}

fn handle_show(path: &Path, index: Option<usize>) -> Result<()> {
    match Dataset::<CaspRecord>::load(path) {
        Ok(dataset) => show_table("CASP", &dataset, index, |r| {
            format!("{} {} [{}]", r.subset, r.target_id, r.pdb_id)
        }),
        Err(DatasetError::UnsupportedFormat { .. }) => Err(CliError::Argument(format!(
            "'{}' is not a .json or .csv table",
            path.display()
        ))),
        Err(casp_err) => match Dataset::<ThermoMutRecord>::load(path) {
            Ok(dataset) => show_table("ThermoMutDB", &dataset, index, |r| {
                format!("{} {} {} [{}]", r.target_mutation_id, r.target_id, r.mutation_code, r.pdb_id)
            }),
            Err(_) => Err(casp_err.into()),
        },
    }
}

fn show_table<R: DatasetRecord>(
    kind: &str,
    dataset: &Dataset<R>,
    index: Option<usize>,
    describe: impl Fn(&R) -> String,
) -> Result<()> {
    println!("{} table: {} record(s)", kind, dataset.len());
    let missing = dataset
        .iter()
        .filter(|r| r.reference_pdb().is_none())
        .count();
    println!("  records without a reference structure: {}", missing);

    match index {
        Some(i) => {
            let record = dataset.get(i)?;
            println!("\n#{} {}", i, describe(record));
            println!("  sequence ({} residues): {}", record.real_fasta().len(), record.real_fasta());
            match record.reference_pdb() {
                Some(pdb) => println!("  reference structure: {} line(s)", pdb.lines().count()),
                None => println!("  reference structure: none"),
            }
        }
        None => {
            for (i, record) in dataset.iter().enumerate() {
                println!("  #{:<4} {} ({} residues)", i, describe(record), record.real_fasta().len());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    struct FakeStructures(HashMap<String, String>);

    impl StructureSource for FakeStructures {
        async fn fetch_pdb(&self, pdb_id: &str) -> Result<Option<String>> {
            Ok(self.0.get(pdb_id).cloned())
        }
    }

    /// Counts lookups so tests can assert nothing was fetched.
    #[derive(Default)]
    struct CountingStructures(AtomicUsize);

    impl StructureSource for CountingStructures {
        async fn fetch_pdb(&self, _pdb_id: &str) -> Result<Option<String>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    struct FakeVariants(HashMap<String, Value>);

    impl VariantSource for FakeVariants {
        async fn variant_information(&self, uniprot: &str) -> Result<Value> {
            Ok(self.0.get(uniprot).cloned().unwrap_or_else(|| json!([])))
        }
    }

    fn recording_callback() -> (ProgressCallback, Arc<Mutex<Vec<Progress>>>) {
        let events = Arc::new(Mutex::new(Vec::<Progress>::new()));
        let sink = events.clone();
        let callback: ProgressCallback = Box::new(move |p: Progress| sink.lock().unwrap().push(p));
        (callback, events)
    }

    fn write_round(root: &Path, folder: &str, rows: &[(&str, &str, &str)]) {
        let dir = root.join("data").join(folder);
        fs::create_dir_all(dir.join("fasta")).unwrap();
        let mut summary = String::from("target,pdb\n");
        for (target, pdb, sequence) in rows {
            summary.push_str(&format!("{},{}\n", target, pdb));
            fs::write(
                dir.join("fasta").join(format!("{}.fasta", pdb)),
                format!(">{}\n{}\n", pdb, sequence),
            )
            .unwrap();
        }
        fs::write(dir.join("domain_summary.csv"), summary).unwrap();
    }

    #[tokio::test]
    async fn casp_rounds_are_concatenated_with_structures() {
        let dir = tempdir().unwrap();
        for round in CaspVersion::INDIVIDUAL {
            write_round(dir.path(), round.folder_name(), &[]);
        }
        write_round(dir.path(), "casp10", &[("T0644", "4fr9", "MKV")]);
        write_round(dir.path(), "casp14", &[("T1024", "6t1z", "GSA"), ("T1030", "6poo", "AAA")]);

        let structures = FakeStructures(
            [("4fr9".to_string(), "ATOM\nEND\n".to_string())]
                .into_iter()
                .collect(),
        );
        let (callback, events) = recording_callback();
        let dataset = build_casp_dataset(
            &CaspCheckout::new(dir.path()),
            CaspVersion::Combined,
            &structures,
            &callback,
        )
        .await
        .unwrap();

        let ids: Vec<&str> = dataset.iter().map(|r| r.target_id.as_str()).collect();
        assert_eq!(ids, vec!["T0644", "T1024", "T1030"]);
        assert_eq!(dataset.get(0).unwrap().reference_pdb(), Some("ATOM\nEND\n"));
        assert_eq!(dataset.get(1).unwrap().reference_pdb(), None);
        assert_eq!(dataset.get(2).unwrap().subset, "casp14");

        let events = events.lock().unwrap();
        let phases = events
            .iter()
            .filter(|e| matches!(e, Progress::StageStart { .. }))
            .count();
        assert_eq!(phases, 5);
    }

    #[tokio::test]
    async fn casp_table_is_loaded_when_already_saved() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("casp.json");
        let saved = Dataset::from_records(vec![CaspRecord {
            subset: "casp13".to_string(),
            target_id: "T0950".to_string(),
            pdb_id: "6ek4".to_string(),
            real_fasta: "MKV".to_string(),
            real_pdb: None,
        }]);
        saved.save(&output).unwrap();

        let structures = CountingStructures::default();
        let (callback, events) = recording_callback();
        let dataset = casp_table(
            &output,
            CaspVersion::Combined,
            None,
            "/nonexistent/CASP-Datasets.git",
            &structures,
            &callback,
        )
        .await
        .unwrap();

        assert_eq!(dataset, saved);
        assert_eq!(structures.0.load(Ordering::SeqCst), 0);
        assert!(events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn casp_table_reuses_a_kept_checkout_without_cloning() {
        let dir = tempdir().unwrap();
        let checkout = dir.path().join("CASP-Datasets");
        write_round(&checkout, "casp11", &[("T0759", "4qrl", "MKV"), ("T0760", "4q9n", "GSA")]);
        let output = dir.path().join("tables").join("casp11.json");

        let structures = CountingStructures::default();
        let (callback, _events) = recording_callback();
        let dataset = casp_table(
            &output,
            CaspVersion::Casp11,
            Some(checkout),
            "/nonexistent/CASP-Datasets.git",
            &structures,
            &callback,
        )
        .await
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(structures.0.load(Ordering::SeqCst), 2);
        assert_eq!(Dataset::<CaspRecord>::load(&output).unwrap(), dataset);
    }

    #[tokio::test]
    async fn thermomutdb_skips_entries_without_wild_type_and_saves_incrementally() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("thermo.json");
        let rows = vec![
            MutationManifestRow {
                id: "1".to_string(),
                uniprot: "P1".to_string(),
                mutation_uniprot: "M1A".to_string(),
            },
            MutationManifestRow {
                id: "2".to_string(),
                uniprot: "P2".to_string(),
                mutation_uniprot: "K2E".to_string(),
            },
        ];
        let variants = FakeVariants(
            [
                (
                    "P1".to_string(),
                    json!([{ "protein": { "sequence": "MKV", "PDB_wild": "1ABC" } }]),
                ),
                (
                    "P2".to_string(),
                    json!([{ "protein": { "sequence": "MKV", "PDB_wild": null } }]),
                ),
            ]
            .into_iter()
            .collect(),
        );
        let structures = FakeStructures(HashMap::new());
        let (callback, events) = recording_callback();

        let dataset = build_thermomutdb_dataset(&rows, &variants, &structures, &output, &callback)
            .await
            .unwrap();

        assert_eq!(dataset.len(), 1);
        let record = dataset.get(0).unwrap();
        assert_eq!(record.pdb_wild_id, "1ABC");
        assert_eq!(record.mutant_sequence().unwrap(), "AKV");

        let saved = Dataset::<ThermoMutRecord>::load(&output).unwrap();
        assert_eq!(saved, dataset);

        let events = events.lock().unwrap();
        let warnings = events
            .iter()
            .filter(|e| matches!(e, Progress::Warning(_)))
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn show_reads_either_table_kind() {
        let dir = tempdir().unwrap();
        let casp_path = dir.path().join("casp.json");
        Dataset::from_records(vec![CaspRecord {
            subset: "casp12".to_string(),
            target_id: "T0859".to_string(),
            pdb_id: "5jo9".to_string(),
            real_fasta: "MKV".to_string(),
            real_pdb: None,
        }])
        .save(&casp_path)
        .unwrap();
        assert!(handle_show(&casp_path, Some(0)).is_ok());
        assert!(handle_show(&casp_path, Some(3)).is_err());
        assert!(handle_show(&dir.path().join("table.parquet"), None).is_err());
    }
}
