//! Logistic regression predictor stored as JSON
//!
//! ```json
//! { "schema_version": "heart-disease/v1", "weights": [0.04, 1.2], "bias": -3.1 }
//! ```

use super::Predictor;
use crate::models::{FeatureVector, Label};
use anyhow::Result;
use serde::{Deserialize, Serialize};

fn default_threshold() -> f64 {
    0.5
}

/// Serialized coefficients of a binary logistic model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// Schema version the coefficients were fitted against
    #[serde(default)]
    pub schema_version: Option<String>,
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

/// Predictor evaluating a [`LogisticModel`]
#[derive(Debug, Clone)]
pub struct LogisticPredictor {
    model: LogisticModel,
}

impl LogisticPredictor {
    pub fn new(model: LogisticModel) -> Self {
        Self { model }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let model: LogisticModel = serde_json::from_slice(bytes)?;
        Ok(Self::new(model))
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }

    /// Probability of the positive class
    pub fn probability(&self, features: &FeatureVector) -> Result<f64> {
        if features.len() != self.model.weights.len() {
            anyhow::bail!(
                "Expected {} features, got {}",
                self.model.weights.len(),
                features.len()
            );
        }
        let z: f64 = self
            .model
            .weights
            .iter()
            .zip(features.values())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.model.bias;
        Ok(1.0 / (1.0 + (-z).exp()))
    }
}

impl Predictor for LogisticPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let p = self.probability(features)?;
        Ok(if p >= self.model.threshold {
            Label::Presence
        } else {
            Label::Absence
        })
    }

    fn backend(&self) -> &str {
        "logistic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults() {
        let p = LogisticPredictor::from_json(br#"{"weights": [1.0, -1.0]}"#).unwrap();
        assert_eq!(p.model().bias, 0.0);
        assert_eq!(p.model().threshold, 0.5);
        assert_eq!(p.model().schema_version, None);
    }

    #[test]
    fn test_predict_sign_of_logit() {
        let p = LogisticPredictor::new(LogisticModel {
            schema_version: None,
            weights: vec![0.1, 2.0],
            bias: -6.0,
            threshold: 0.5,
        });
        // 0.1 * 54 + 2.0 * 1 - 6.0 = 1.4
        assert_eq!(
            p.predict(&FeatureVector::new(vec![54.0, 1.0])).unwrap(),
            Label::Presence
        );
        // 0.1 * 30 + 0 - 6.0 = -3.0
        assert_eq!(
            p.predict(&FeatureVector::new(vec![30.0, 0.0])).unwrap(),
            Label::Absence
        );
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let p = LogisticPredictor::from_json(br#"{"weights": [1.0, 2.0, 3.0]}"#).unwrap();
        let err = p.predict(&FeatureVector::new(vec![1.0])).unwrap_err();
        assert!(err.to_string().contains("Expected 3 features, got 1"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(LogisticPredictor::from_json(b"{\"bias\": 1.0}").is_err());
    }
}
