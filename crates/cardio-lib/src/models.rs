//! Core data models for the prediction pipeline

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Raw answers keyed by feature name
pub type Answers = BTreeMap<String, FeatureValue>;

/// A raw value entered for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Choice(String),
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Number(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Choice(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Choice(value)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Choice(s) => f.write_str(s),
        }
    }
}

/// Fixed-order numeric encoding of one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Single-precision copy for inference engines that take f32 input
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|v| *v as f32).collect()
    }
}

/// Binary outcome produced by a predictor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Absence,
    Presence,
}

impl Label {
    /// Map a raw class value; anything other than 0 or 1 is rejected
    pub fn from_class(value: i64) -> Option<Self> {
        match value {
            0 => Some(Label::Absence),
            1 => Some(Label::Presence),
            _ => None,
        }
    }

    pub fn as_class(self) -> u8 {
        match self {
            Label::Absence => 0,
            Label::Presence => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Absence => "Absence",
            Label::Presence => "Presence",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels for one feature vector, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    entries: Vec<(String, Label)>,
}

impl PredictionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, label: Label) {
        self.entries.push((identifier.into(), label));
    }

    pub fn get(&self, identifier: &str) -> Option<Label> {
        self.entries
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, label)| *label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Label)> {
        self.entries.iter().map(|(id, label)| (id.as_str(), *label))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of models voting `Presence`
    pub fn presence_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, label)| *label == Label::Presence)
            .count()
    }
}
