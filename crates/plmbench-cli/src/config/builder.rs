use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, ComparisonSettings, DatasetSettings, ModelSettings, ViewSettings};
use crate::error::{CliError, Result};
use plmbench::align::{AlignerOptions, AlignmentMethod};
use std::path::Path;
use std::str::FromStr;

/// Values given as dedicated command-line flags. These win over every other source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub method: Option<AlignmentMethod>,
    pub num_steps: Option<usize>,
    pub temperature: Option<f64>,
}

/// Merges built-in defaults, the optional config file, `--set` values and CLI flags, in
/// increasing order of precedence.
pub fn build_config(
    config_path: Option<&Path>,
    set_values: &[String],
    overrides: &CliOverrides,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, set_values)?;

    let model_file = file_config.model.take().unwrap_or_default();
    let mut token_envs = vec![model_file.token_env.unwrap_or(defaults.token_env)];
    if !token_envs.contains(&defaults.fallback_token_env) {
        token_envs.push(defaults.fallback_token_env);
    }
    let model = ModelSettings {
        endpoint: model_file.endpoint.unwrap_or(defaults.endpoint),
        model_id: model_file.model_id.unwrap_or(defaults.model_id),
        token_envs,
        num_steps: overrides
            .num_steps
            .or(model_file.num_steps)
            .unwrap_or(defaults.num_steps),
        temperature: overrides.temperature.or(model_file.temperature),
    };
    if model.num_steps == 0 {
        return Err(CliError::Config(
            "`model.num-steps` must be at least 1".to_string(),
        ));
    }

    let comparison_file = file_config.comparison.take().unwrap_or_default();
    let comparison = ComparisonSettings {
        method: overrides
            .method
            .or(comparison_file.method)
            .unwrap_or(defaults.method),
        options: AlignerOptions {
            multimer_mode: Some(
                comparison_file
                    .multimer_mode
                    .unwrap_or(defaults.multimer_mode),
            ),
            ter_mode: Some(comparison_file.ter_mode.unwrap_or(defaults.ter_mode)),
            average_length: comparison_file
                .average_length
                .unwrap_or(defaults.average_length),
            extra_args: comparison_file.extra_args.unwrap_or_default(),
        },
        tmalign_path: comparison_file.tmalign_path,
        usalign_path: comparison_file.usalign_path,
    };

    let datasets_file = file_config.datasets.take().unwrap_or_default();
    let datasets = DatasetSettings {
        casp_repository: datasets_file
            .casp_repository
            .unwrap_or(defaults.casp_repository),
        rcsb_url: datasets_file.rcsb_url.unwrap_or(defaults.rcsb_url),
        thermomutdb_url: datasets_file
            .thermomutdb_url
            .unwrap_or(defaults.thermomutdb_url),
    };

    let view_file = file_config.view.take().unwrap_or_default();
    let view = ViewSettings {
        width: view_file.width.unwrap_or(defaults.view_width),
        height: view_file.height.unwrap_or(defaults.view_height),
    };

    Ok(AppConfig {
        model,
        comparison,
        datasets,
        view,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value_str = value_str.trim();

        match key {
            "model.endpoint" => {
                config.model.get_or_insert_with(Default::default).endpoint =
                    Some(value_str.to_string());
            }
            "model.model-id" => {
                config.model.get_or_insert_with(Default::default).model_id =
                    Some(value_str.to_string());
            }
            "model.token-env" => {
                config.model.get_or_insert_with(Default::default).token_env =
                    Some(value_str.to_string());
            }
            "model.num-steps" => {
                config.model.get_or_insert_with(Default::default).num_steps =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "model.temperature" => {
                config.model.get_or_insert_with(Default::default).temperature =
                    Some(parse_value(key, value_str, "float")?);
            }
            "comparison.method" => {
                config.comparison.get_or_insert_with(Default::default).method =
                    Some(parse_value(key, value_str, "method")?);
            }
            "comparison.multimer-mode" => {
                config
                    .comparison
                    .get_or_insert_with(Default::default)
                    .multimer_mode = Some(parse_value(key, value_str, "integer")?);
            }
            "comparison.ter-mode" => {
                config.comparison.get_or_insert_with(Default::default).ter_mode =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "comparison.average-length" => {
                config
                    .comparison
                    .get_or_insert_with(Default::default)
                    .average_length = Some(parse_value(key, value_str, "boolean")?);
            }
            "comparison.extra-args" => {
                let args = value_str.split_whitespace().map(str::to_string).collect();
                config.comparison.get_or_insert_with(Default::default).extra_args = Some(args);
            }
            "comparison.tmalign-path" => {
                config
                    .comparison
                    .get_or_insert_with(Default::default)
                    .tmalign_path = Some(value_str.into());
            }
            "comparison.usalign-path" => {
                config
                    .comparison
                    .get_or_insert_with(Default::default)
                    .usalign_path = Some(value_str.into());
            }
            "datasets.casp-repository" => {
                config
                    .datasets
                    .get_or_insert_with(Default::default)
                    .casp_repository = Some(value_str.to_string());
            }
            "datasets.rcsb-url" => {
                config.datasets.get_or_insert_with(Default::default).rcsb_url =
                    Some(value_str.to_string());
            }
            "datasets.thermomutdb-url" => {
                config
                    .datasets
                    .get_or_insert_with(Default::default)
                    .thermomutdb_url = Some(value_str.to_string());
            }
            "view.width" => {
                config.view.get_or_insert_with(Default::default).width =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "view.height" => {
                config.view.get_or_insert_with(Default::default).height =
                    Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plmbench::align::ExternalTool;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plmbench.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let config = build_config(None, &[], &CliOverrides::default()).unwrap();

        assert_eq!(
            config.model.endpoint,
            "https://forge.evolutionaryscale.ai/api/v1/generate"
        );
        assert_eq!(config.model.model_id, "esm3-open");
        assert_eq!(config.model.num_steps, 8);
        assert_eq!(config.model.temperature, None);
        assert_eq!(config.model.token_envs, vec!["ESM_API_TOKEN", "HF_TOKEN"]);
        assert_eq!(config.comparison.method, AlignmentMethod::UsAlign);
        assert_eq!(
            config.comparison.options.to_args(),
            vec!["-mm", "1", "-ter", "0"]
        );
        assert_eq!(config.datasets.rcsb_url, "https://files.rcsb.org/download");
        assert_eq!((config.view.width, config.view.height), (500, 500));
    }

    #[test]
    fn file_then_set_then_flags_take_precedence() {
        let (_dir, path) = write_config(
            r#"
[model]
num-steps = 4
temperature = 0.5
token-env = "HF_TOKEN"

[comparison]
method = "tm-align"
average-length = true
tmalign-path = "/opt/TMalign"

[view]
width = 900
"#,
        );

        let config = build_config(
            Some(&path),
            &["model.num-steps=2".to_string(), "view.height=300".to_string()],
            &CliOverrides {
                num_steps: Some(1),
                method: Some(AlignmentMethod::All),
                temperature: None,
            },
        )
        .unwrap();

        assert_eq!(config.model.num_steps, 1);
        assert_eq!(config.model.temperature, Some(0.5));
        assert_eq!(config.model.token_envs, vec!["HF_TOKEN"]);
        assert_eq!(config.comparison.method, AlignmentMethod::All);
        assert!(config.comparison.options.average_length);
        assert_eq!(config.comparison.tmalign_path, Some(PathBuf::from("/opt/TMalign")));
        assert_eq!((config.view.width, config.view.height), (900, 300));

        let without_flags = build_config(
            Some(&path),
            &["model.num-steps=2".to_string()],
            &CliOverrides::default(),
        )
        .unwrap();
        assert_eq!(without_flags.model.num_steps, 2);
        assert_eq!(without_flags.comparison.method, AlignmentMethod::TmAlign);
    }

    #[test]
    fn extra_args_follow_the_generated_flags() {
        let (_dir, path) = write_config("[comparison]\nextra-args = [\"-byresi\", \"1\"]\n");

        let config = build_config(Some(&path), &[], &CliOverrides::default()).unwrap();
        assert_eq!(
            config.comparison.options.to_args(),
            vec!["-mm", "1", "-ter", "0", "-byresi", "1"]
        );

        let config = build_config(
            Some(&path),
            &["comparison.extra-args=-outfmt  2".to_string()],
            &CliOverrides::default(),
        )
        .unwrap();
        assert_eq!(config.comparison.options.extra_args, vec!["-outfmt", "2"]);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let (_dir, path) = write_config("[model]\nnum_steps = 3\n");
        assert!(matches!(
            build_config(Some(&path), &[], &CliOverrides::default()),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn invalid_set_values_are_config_errors() {
        for bad in ["model.num-steps", "model.num-steps=abc", "nope.key=1", "comparison.method=x"] {
            let result = build_config(None, &[bad.to_string()], &CliOverrides::default());
            assert!(matches!(result, Err(CliError::Config(_))), "{} accepted", bad);
        }
    }

    #[test]
    fn zero_steps_is_rejected() {
        assert!(build_config(None, &["model.num-steps=0".to_string()], &CliOverrides::default()).is_err());
    }

    #[test]
    fn locator_uses_configured_paths() {
        let dir = tempdir().unwrap();
        let tool = dir.path().join("my-usalign");
        fs::write(&tool, "").unwrap();

        let config = build_config(
            None,
            &[format!("comparison.usalign-path={}", tool.display())],
            &CliOverrides::default(),
        )
        .unwrap();
        let locator = config.comparison.locator(dir.path());
        assert_eq!(locator.locate(ExternalTool::UsAlign).unwrap(), tool);
    }
}
