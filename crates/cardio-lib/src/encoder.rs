//! Encoding of raw answers into a feature vector
//!
//! Numbers pass through unchanged. Categorical answers become the 0-based
//! position of the matching option. Matching is exact and case-sensitive;
//! an unknown option is rejected rather than defaulted.

use crate::error::EncodeError;
use crate::models::{Answers, FeatureValue, FeatureVector};
use crate::schema::{FeatureKind, FeatureSchema};
use tracing::debug;

/// Encode `values` in schema order
pub fn encode(schema: &FeatureSchema, values: &Answers) -> Result<FeatureVector, EncodeError> {
    let mut encoded = Vec::with_capacity(schema.len());

    for spec in schema {
        let value = values
            .get(&spec.name)
            .ok_or_else(|| EncodeError::SchemaMismatch {
                feature: spec.name.clone(),
            })?;

        let scalar = match (&spec.kind, value) {
            (FeatureKind::Number, FeatureValue::Number(n)) if n.is_finite() => *n,
            (FeatureKind::Number, _) => {
                return Err(EncodeError::WrongKind {
                    feature: spec.name.clone(),
                })
            }
            (FeatureKind::Category(options), FeatureValue::Choice(choice)) => options
                .iter()
                .position(|o| o == choice)
                .ok_or_else(|| EncodeError::InvalidCategory {
                    feature: spec.name.clone(),
                    value: choice.clone(),
                })? as f64,
            (FeatureKind::Category(_), other) => {
                return Err(EncodeError::InvalidCategory {
                    feature: spec.name.clone(),
                    value: other.to_string(),
                })
            }
        };
        encoded.push(scalar);
    }

    for name in values.keys().filter(|name| schema.get(name).is_none()) {
        debug!(feature = %name, "Ignoring answer for unknown feature");
    }

    Ok(FeatureVector::new(encoded))
}
