//! Predictor implementations

mod inference;
mod linear;

pub use inference::OnnxPredictor;
pub use linear::{LogisticModel, LogisticPredictor};

use crate::models::{FeatureVector, Label};
use anyhow::Result;

/// Trait for prediction implementations
pub trait Predictor: Send + Sync {
    /// Classify a single feature vector
    fn predict(&self, features: &FeatureVector) -> Result<Label>;

    /// Short name of the backing engine, for listings and logs
    fn backend(&self) -> &str;
}
