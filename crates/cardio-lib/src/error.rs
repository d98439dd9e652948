//! Error taxonomy for the prediction pipeline
//!
//! Load and prediction errors are recoverable and scoped to a single model.
//! Encode errors reject the current submission only.

use serde::Serialize;
use thiserror::Error;

/// Why a model could not be loaded from the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum LoadFailure {
    #[error("model file not found")]
    NotFound,
    #[error("{0}")]
    DeserializationFailed(String),
}

/// A model that failed to load, recorded in the registry as a warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("failed to load model '{identifier}': {reason}")]
pub struct ModelLoadError {
    pub identifier: String,
    pub reason: LoadFailure,
}

impl ModelLoadError {
    pub fn new(identifier: impl Into<String>, reason: LoadFailure) -> Self {
        Self {
            identifier: identifier.into(),
            reason,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.reason == LoadFailure::NotFound
    }
}

/// Errors raised while turning raw answers into a feature vector
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("no value supplied for feature '{feature}'")]
    SchemaMismatch { feature: String },

    #[error("'{value}' is not a valid option for feature '{feature}'")]
    InvalidCategory { feature: String, value: String },

    #[error("feature '{feature}' expects a finite number")]
    WrongKind { feature: String },
}

impl EncodeError {
    /// Name of the offending feature
    pub fn feature(&self) -> &str {
        match self {
            EncodeError::SchemaMismatch { feature }
            | EncodeError::InvalidCategory { feature, .. }
            | EncodeError::WrongKind { feature } => feature,
        }
    }
}

/// A single model failed on an otherwise valid vector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("model '{identifier}' failed to predict: {message}")]
pub struct PredictionError {
    pub identifier: String,
    pub message: String,
}

/// Run-level refusal, raised before any model is invoked
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("only {loaded} model(s) loaded, at least {required} required")]
    InsufficientModels { loaded: usize, required: usize },
}

/// Invalid feature schema definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate feature name '{0}'")]
    DuplicateFeature(String),

    #[error("categorical feature '{0}' has no options")]
    EmptyOptions(String),

    #[error("categorical feature '{feature}' lists option '{option}' more than once")]
    DuplicateOption { feature: String, option: String },
}

/// Failure reading an answer from the UI
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input closed before a value for '{0}' was entered")]
    Closed(String),

    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
