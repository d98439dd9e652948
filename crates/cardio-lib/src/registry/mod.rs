//! Model registry
//!
//! Built once from a list of identifiers and read-only afterwards. Models
//! that fail to load are recorded next to the loaded ones; a partially
//! loaded registry is a normal state, not an error.

mod store;

pub use store::{compute_checksum, DirectoryStore, ModelStore, MANIFEST_FILE};

use crate::error::ModelLoadError;
use crate::observability::ServiceMetrics;
use crate::predictor::Predictor;
use crate::schema::FeatureSchema;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Load state of the registry as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryStatus {
    /// Every requested model loaded
    Healthy,
    /// Some models failed but at least one is available
    Degraded,
    /// No model available
    Unhealthy,
}

impl RegistryStatus {
    /// Returns true if predictions can be produced
    pub fn is_operational(&self) -> bool {
        matches!(self, RegistryStatus::Healthy | RegistryStatus::Degraded)
    }
}

/// Read-only collection of loaded predictors
#[derive(Default)]
pub struct ModelRegistry {
    entries: Vec<(String, Box<dyn Predictor>)>,
    failures: Vec<ModelLoadError>,
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("loaded", &self.identifiers().collect::<Vec<_>>())
            .field("failures", &self.failures)
            .finish()
    }
}

impl ModelRegistry {
    /// Load every identifier from `store`, keeping going past failures
    pub fn load<S, I>(store: &S, schema: &FeatureSchema, identifiers: I) -> Self
    where
        S: ModelStore + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let metrics = ServiceMetrics::new();
        let mut registry = Self::default();
        let mut seen = HashSet::new();

        for identifier in identifiers {
            let identifier = identifier.as_ref();
            if !seen.insert(identifier.to_string()) {
                warn!(identifier = %identifier, "Duplicate model identifier ignored");
                continue;
            }

            match store.fetch(identifier, schema) {
                Ok(predictor) => {
                    info!(
                        event = "model_loaded",
                        identifier = %identifier,
                        backend = %predictor.backend(),
                        "Model loaded"
                    );
                    registry.entries.push((identifier.to_string(), predictor));
                }
                Err(reason) => {
                    let err = ModelLoadError::new(identifier, reason);
                    warn!(
                        event = "model_load_failed",
                        identifier = %identifier,
                        error = %err.reason,
                        "Model failed to load"
                    );
                    metrics.inc_model_load_failures();
                    registry.failures.push(err);
                }
            }
        }

        metrics.set_models_loaded(registry.len() as i64);
        registry
    }

    /// Build a registry from already constructed predictors
    pub fn from_predictors<I, S>(predictors: I) -> Self
    where
        I: IntoIterator<Item = (S, Box<dyn Predictor>)>,
        S: Into<String>,
    {
        Self {
            entries: predictors
                .into_iter()
                .map(|(id, predictor)| (id.into(), predictor))
                .collect(),
            failures: Vec::new(),
        }
    }

    /// Loaded predictors in load order
    pub fn get_loaded(&self) -> impl Iterator<Item = (&str, &dyn Predictor)> {
        self.entries
            .iter()
            .map(|(id, predictor)| (id.as_str(), predictor.as_ref()))
    }

    pub fn get(&self, identifier: &str) -> Option<&dyn Predictor> {
        self.entries
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, predictor)| predictor.as_ref())
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    /// Models that could not be loaded, with reasons
    pub fn failures(&self) -> &[ModelLoadError] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn status(&self) -> RegistryStatus {
        if self.entries.is_empty() {
            RegistryStatus::Unhealthy
        } else if self.failures.is_empty() {
            RegistryStatus::Healthy
        } else {
            RegistryStatus::Degraded
        }
    }
}
