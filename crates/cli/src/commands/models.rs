//! List configured models and their load status

use cardio_lib::{FeatureSchema, LoadFailure, StructuredLogger};
use serde::Serialize;
use tabled::Tabled;

use super::load_registry;
use crate::config::AppConfig;
use crate::output::{color_status, print_heading, print_json, print_table, OutputFormat};

/// Row for the models table
#[derive(Tabled, Serialize)]
struct ModelRow {
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Backend")]
    backend: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Serialize)]
struct ModelsReport<'a> {
    models_dir: String,
    status: cardio_lib::RegistryStatus,
    models: &'a [ModelRow],
}

/// Load every configured model and report which succeeded
pub fn show(
    config: &AppConfig,
    schema: &FeatureSchema,
    logger: &StructuredLogger,
    format: OutputFormat,
) {
    let registry = load_registry(config, schema, logger);

    let rows: Vec<ModelRow> = config
        .model_ids
        .iter()
        .filter_map(|id| {
            if let Some(predictor) = registry.get(id) {
                return Some(ModelRow {
                    model: id.clone(),
                    status: "loaded".to_string(),
                    backend: predictor.backend().to_string(),
                    detail: String::new(),
                });
            }
            let failure = registry.failures().iter().find(|f| &f.identifier == id)?;
            let (status, detail) = match &failure.reason {
                LoadFailure::NotFound => ("not found", String::new()),
                LoadFailure::DeserializationFailed(message) => ("failed", message.clone()),
            };
            Some(ModelRow {
                model: id.clone(),
                status: status.to_string(),
                backend: String::new(),
                detail,
            })
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&ModelsReport {
            models_dir: config.models_dir.display().to_string(),
            status: registry.status(),
            models: &rows,
        }),
        OutputFormat::Table => {
            print_heading(&format!("Models in {}", config.models_dir.display()));
            print_table(&rows, format);
            println!(
                "\n{} of {} loaded, registry {}",
                registry.len(),
                rows.len(),
                color_status(registry.status())
            );
        }
    }
}
