//! Prediction runner
//!
//! Applies every loaded model to one feature vector. Models are independent:
//! a model that errors is left out of the result and reported, the rest
//! still run.

use crate::error::{PredictionError, RunError};
use crate::models::{FeatureVector, PredictionResult};
use crate::observability::{ServiceMetrics, StructuredLogger};
use crate::registry::ModelRegistry;
use serde::Serialize;
use std::time::Instant;

/// Labels plus the models that failed on this vector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredictionOutcome {
    pub result: PredictionResult,
    pub failures: Vec<PredictionError>,
}

/// Runs a registry against submitted vectors
#[derive(Clone)]
pub struct PredictionRunner {
    min_models: usize,
    logger: StructuredLogger,
    metrics: ServiceMetrics,
}

impl PredictionRunner {
    pub fn new(logger: StructuredLogger) -> Self {
        Self {
            min_models: 0,
            logger,
            metrics: ServiceMetrics::new(),
        }
    }

    /// Refuse to run when fewer than `min_models` models are loaded
    pub fn with_min_models(mut self, min_models: usize) -> Self {
        self.min_models = min_models;
        self
    }

    pub fn min_models(&self) -> usize {
        self.min_models
    }

    /// Invoke every loaded predictor once on `vector`
    pub fn run(
        &self,
        registry: &ModelRegistry,
        vector: &FeatureVector,
    ) -> Result<PredictionOutcome, RunError> {
        if registry.len() < self.min_models {
            let err = RunError::InsufficientModels {
                loaded: registry.len(),
                required: self.min_models,
            };
            self.logger.log_submission_rejected(&err.to_string());
            self.metrics.inc_submissions_rejected();
            return Err(err);
        }

        let mut outcome = PredictionOutcome::default();
        for (identifier, predictor) in registry.get_loaded() {
            let start = Instant::now();
            let prediction = predictor.predict(vector);
            let elapsed = start.elapsed();
            self.metrics.observe_prediction_latency(elapsed.as_secs_f64());

            match prediction {
                Ok(label) => {
                    self.metrics.inc_predictions();
                    self.logger
                        .log_prediction(identifier, label.as_str(), elapsed.as_micros());
                    outcome.result.insert(identifier, label);
                }
                Err(e) => {
                    let message = format!("{:#}", e);
                    self.metrics.inc_prediction_errors();
                    self.logger.log_prediction_failed(identifier, &message);
                    outcome.failures.push(PredictionError {
                        identifier: identifier.to_string(),
                        message,
                    });
                }
            }
        }

        Ok(outcome)
    }
}
