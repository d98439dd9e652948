//! Feature schema for the clinical form
//!
//! The schema fixes both the questions asked and the column order of every
//! feature vector. Models are trained against one schema version, so the
//! order here must only change together with `version`.

use crate::error::SchemaError;
use serde::Serialize;
use std::collections::HashSet;

/// Version of the built-in heart disease schema
pub const HEART_DISEASE_SCHEMA_VERSION: &str = "heart-disease/v1";

/// Kind of value a feature accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum FeatureKind {
    Number,
    /// Ordered options; the encoded value is the option's index
    Category(Vec<String>),
}

/// Description of one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
    pub prompt: String,
}

impl FeatureSpec {
    pub fn number(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Number,
            prompt: prompt.into(),
        }
    }

    pub fn category<I, S>(name: impl Into<String>, options: I, prompt: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: FeatureKind::Category(options.into_iter().map(Into::into).collect()),
            prompt: prompt.into(),
        }
    }

    /// Options for categorical features, `None` for numbers
    pub fn options(&self) -> Option<&[String]> {
        match &self.kind {
            FeatureKind::Category(options) => Some(options),
            FeatureKind::Number => None,
        }
    }

    /// Position of `value` in the option list (exact, case-sensitive)
    pub fn option_index(&self, value: &str) -> Option<usize> {
        self.options()?.iter().position(|o| o == value)
    }
}

/// Ordered, versioned set of features
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    version: String,
    features: Vec<FeatureSpec>,
}

impl FeatureSchema {
    /// Build a schema, checking name uniqueness and option lists
    pub fn new(version: impl Into<String>, features: Vec<FeatureSpec>) -> Result<Self, SchemaError> {
        let mut names = HashSet::new();
        for spec in &features {
            if !names.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateFeature(spec.name.clone()));
            }
            if let Some(options) = spec.options() {
                if options.is_empty() {
                    return Err(SchemaError::EmptyOptions(spec.name.clone()));
                }
                let mut seen = HashSet::new();
                for option in options {
                    if !seen.insert(option.as_str()) {
                        return Err(SchemaError::DuplicateOption {
                            feature: spec.name.clone(),
                            option: option.clone(),
                        });
                    }
                }
            }
        }

        Ok(Self {
            version: version.into(),
            features,
        })
    }

    /// The ten-question heart disease form
    pub fn heart_disease() -> Self {
        let features = vec![
            FeatureSpec::number("Age", "Enter your age in years"),
            FeatureSpec::category("Sex", ["Male", "Female"], "Select your gender"),
            FeatureSpec::category(
                "Chest pain type",
                ["Typical angina", "Atypical angina", "Non-anginal pain", "Asymptomatic"],
                "Select the type of chest pain experienced",
            ),
            FeatureSpec::number("BP", "Enter your resting blood pressure (mm Hg)"),
            FeatureSpec::number("Cholesterol", "Enter your cholesterol level (mg/dL)"),
            FeatureSpec::category(
                "FBS over 120",
                ["Yes", "No"],
                "Select if fasting blood sugar > 120 mg/dL",
            ),
            FeatureSpec::category(
                "EKG results",
                ["Normal", "ST-T wave abnormality", "Left ventricular hypertrophy"],
                "Select the result of the resting electrocardiographic measurement",
            ),
            FeatureSpec::number("Max HR", "Enter your maximum heart rate achieved"),
            FeatureSpec::category(
                "Exercise angina",
                ["Yes", "No"],
                "Select if angina was induced by exercise",
            ),
            FeatureSpec::number(
                "ST depression",
                "Enter the ST depression induced by exercise relative to rest",
            ),
        ];

        Self {
            version: HEART_DISEASE_SCHEMA_VERSION.to_string(),
            features,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in vector order
    pub fn iter(&self) -> impl Iterator<Item = &FeatureSpec> {
        self.features.iter()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureSpec> {
        self.features.iter().find(|f| f.name == name)
    }
}

impl<'a> IntoIterator for &'a FeatureSchema {
    type Item = &'a FeatureSpec;
    type IntoIter = std::slice::Iter<'a, FeatureSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
