//! ONNX inference using tract
//!
//! Runs exported classifiers (scikit-learn via skl2onnx, XGBoost, small
//! neural networks) loaded with tract-onnx. The first graph output is read
//! as the class label: an integer tensor holds the class itself, a single
//! float is a positive-class score thresholded at 0.5, and a pair of floats
//! is a `[absence, presence]` probability row.

use super::Predictor;
use crate::models::{FeatureVector, Label};
use anyhow::{Context, Result};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Score at or above which a float output is read as `Presence`
const SCORE_THRESHOLD: f32 = 0.5;

/// Maximum inference latency before warning
const MAX_INFERENCE_MS: u128 = 50;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// ONNX-based predictor using tract for lightweight inference
pub struct OnnxPredictor {
    model: TractModel,
    num_features: usize,
}

impl std::fmt::Debug for OnnxPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPredictor")
            .field("num_features", &self.num_features)
            .finish_non_exhaustive()
    }
}

impl OnnxPredictor {
    /// Create a predictor from model bytes, fixing the input to `[1, num_features]`
    pub fn new(model_bytes: &[u8], num_features: usize) -> Result<Self> {
        let model = Self::load_model(model_bytes, num_features)?;
        Ok(Self {
            model,
            num_features,
        })
    }

    /// Load and optimize an ONNX model from bytes
    fn load_model(model_bytes: &[u8], num_features: usize) -> Result<TractModel> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .context("Failed to parse ONNX model")?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .context("Failed to set input shape")?
            .into_optimized()
            .context("Failed to optimize model")?
            .into_runnable()
            .context("Failed to create runnable model")?;
        Ok(model)
    }

    /// Convert feature vector to a single-row tensor
    fn features_to_tensor(&self, features: &FeatureVector) -> Result<Tensor> {
        if features.len() != self.num_features {
            anyhow::bail!(
                "Model expects {} features, got {}",
                self.num_features,
                features.len()
            );
        }
        let array = tract_ndarray::Array2::from_shape_vec((1, self.num_features), features.to_f32())
            .context("Failed to shape input tensor")?;
        Ok(array.into())
    }

    /// Read the class label from the first output tensor
    ///
    /// Accepted outputs for a single row: one integer class, one float
    /// positive-class score, or two float scores ordered `[absence, presence]`.
    fn tensor_to_label(output: &Tensor) -> Result<Label> {
        if output.datum_type().is_float() {
            let scores = output.cast_to::<f32>()?;
            return match *scores.as_slice::<f32>()? {
                [score] => Ok(if score >= SCORE_THRESHOLD {
                    Label::Presence
                } else {
                    Label::Absence
                }),
                [absence, presence] => Ok(if presence > absence {
                    Label::Presence
                } else {
                    Label::Absence
                }),
                _ => anyhow::bail!("Unsupported score output shape {:?}", output.shape()),
            };
        }

        let classes = output.cast_to::<i64>()?;
        match *classes.as_slice::<i64>()? {
            [class] => Label::from_class(class)
                .with_context(|| format!("Model returned non-binary class {}", class)),
            _ => anyhow::bail!("Unsupported class output shape {:?}", output.shape()),
        }
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<Label> {
        let start = Instant::now();

        let input = self.features_to_tensor(features)?;
        let result = self.model.run(tvec!(input.into()))?;
        let output = result.first().context("No output from model")?;

        let elapsed = start.elapsed();
        if elapsed.as_millis() > MAX_INFERENCE_MS {
            warn!(elapsed_ms = elapsed.as_millis(), "Inference exceeded {}ms target", MAX_INFERENCE_MS);
        } else {
            debug!(elapsed_us = elapsed.as_micros(), "Inference completed");
        }

        Self::tensor_to_label(output)
    }

    fn backend(&self) -> &str {
        "onnx"
    }
}
