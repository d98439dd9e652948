//! Result presentation

use crate::error::{ModelLoadError, PredictionError};
use crate::models::{Label, PredictionResult};
use crate::runner::PredictionOutcome;
use serde::Serialize;

/// One line per model: `Prediction by <id>: Presence|Absence`
pub fn render(result: &PredictionResult) -> Vec<String> {
    result
        .iter()
        .map(|(identifier, label)| render_line(identifier, label))
        .collect()
}

pub fn render_line(identifier: &str, label: Label) -> String {
    format!("Prediction by {}: {}", identifier, label)
}

/// Single model entry of a JSON report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelPrediction {
    pub model: String,
    pub prediction: Label,
    pub class: u8,
}

/// Machine-readable summary of one submission
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub schema_version: String,
    pub generated_at: String,
    pub features: Vec<f64>,
    pub predictions: Vec<ModelPrediction>,
    pub presence_votes: usize,
    pub prediction_failures: Vec<PredictionError>,
    pub load_failures: Vec<ModelLoadError>,
}

impl PredictionReport {
    pub fn new(
        schema_version: &str,
        features: &[f64],
        outcome: &PredictionOutcome,
        load_failures: &[ModelLoadError],
    ) -> Self {
        Self {
            schema_version: schema_version.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            features: features.to_vec(),
            predictions: outcome
                .result
                .iter()
                .map(|(model, label)| ModelPrediction {
                    model: model.to_string(),
                    prediction: label,
                    class: label.as_class(),
                })
                .collect(),
            presence_votes: outcome.result.presence_count(),
            prediction_failures: outcome.failures.clone(),
            load_failures: load_failures.to_vec(),
        }
    }
}
