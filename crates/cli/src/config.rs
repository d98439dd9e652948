//! Configuration management for the CLI

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent
/// (`cardio.toml`, `cardio.json`, ...)
pub const DEFAULT_CONFIG_NAME: &str = "cardio";

/// Environment variable prefix (`CARDIO_MODELS_DIR`, `CARDIO_MIN_MODELS`, ...)
pub const ENV_PREFIX: &str = "CARDIO";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding `<id>.onnx` / `<id>.json` model files
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Models to load, in display order
    #[serde(default = "default_model_ids")]
    pub model_ids: Vec<String>,

    /// Refuse to predict with fewer loaded models than this
    #[serde(default)]
    pub min_models: usize,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_model_ids() -> Vec<String> {
    [
        "logistic_regression",
        "k_nearest_neighbors",
        "decision_tree",
        "random_forest",
        "support_vector_machine",
        "gradient_boosting",
        "adaboost",
        "gaussian_naive_bayes",
        "xgboost",
        "neural_network",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            model_ids: default_model_ids(),
            min_models: 0,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("model_ids"),
            )
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }
}
