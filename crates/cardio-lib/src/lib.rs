//! Core library for heart disease prediction
//!
//! This crate provides the pipeline behind the `cardio` binary:
//! - Feature schema describing the clinical form
//! - Input collection and encoding into a fixed-order feature vector
//! - Model loading from a directory store into a read-only registry
//! - Running every loaded model and presenting the labels
//! - Structured logging and Prometheus metrics

pub mod encoder;
pub mod error;
pub mod input;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod presenter;
pub mod registry;
pub mod runner;
pub mod schema;

pub use encoder::encode;
pub use error::{
    EncodeError, InputError, LoadFailure, ModelLoadError, PredictionError, RunError, SchemaError,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use predictor::Predictor;
pub use presenter::{render, PredictionReport};
pub use registry::{DirectoryStore, ModelRegistry, ModelStore, RegistryStatus};
pub use runner::{PredictionOutcome, PredictionRunner};
pub use schema::{FeatureKind, FeatureSchema, FeatureSpec};
