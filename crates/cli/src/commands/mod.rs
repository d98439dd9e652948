//! Subcommand implementations

pub mod models;
pub mod predict;
pub mod schema;

use crate::config::AppConfig;
use crate::output::status_name;
use cardio_lib::{DirectoryStore, FeatureSchema, ModelRegistry, StructuredLogger};

/// Load the configured models from the configured directory
pub fn load_registry(
    config: &AppConfig,
    schema: &FeatureSchema,
    logger: &StructuredLogger,
) -> ModelRegistry {
    let store = DirectoryStore::open(&config.models_dir);
    let registry = ModelRegistry::load(&store, schema, &config.model_ids);
    logger.log_registry_loaded(
        registry.len(),
        registry.failures().len(),
        status_name(registry.status()),
    );
    registry
}
