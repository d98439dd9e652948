//! Print the feature schema

use cardio_lib::{FeatureKind, FeatureSchema};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_heading, print_table, OutputFormat};

/// Row for the schema table
#[derive(Tabled, Serialize)]
struct FeatureRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Feature")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Options (encoded 0..n)")]
    options: String,
    #[tabled(rename = "Prompt")]
    prompt: String,
}

/// Show every feature in vector order
pub fn show(schema: &FeatureSchema, format: OutputFormat) {
    let rows: Vec<FeatureRow> = schema
        .iter()
        .enumerate()
        .map(|(position, spec)| FeatureRow {
            position,
            name: spec.name.clone(),
            kind: match spec.kind {
                FeatureKind::Number => "number".to_string(),
                FeatureKind::Category(_) => "category".to_string(),
            },
            options: spec.options().map(|o| o.join(" | ")).unwrap_or_default(),
            prompt: spec.prompt.clone(),
        })
        .collect();

    if format == OutputFormat::Table {
        print_heading(&format!("Feature schema {}", schema.version()));
    }
    print_table(&rows, format);
}
