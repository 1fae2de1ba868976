//! Feature schema and record encoding
//!
//! Numeric features are standardised with the training mean/scale;
//! categorical features are one-hot encoded against the trained vocabulary.
//! Anything outside the schema fails instead of being coerced.

use crate::errors::{RiskError, Result};
use crate::types::{FeatureRecord, FeatureValue};
use serde::{Deserialize, Serialize};

fn default_scale() -> f64 {
    1.0
}

/// How one feature is represented in the encoded row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    Numeric {
        #[serde(default)]
        mean: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
    Categorical { categories: Vec<String> },
}

/// One entry of the artifact's training-time feature schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: FeatureKind,
}

impl FeatureSpec {
    /// Number of encoded columns this feature occupies
    pub fn width(&self) -> usize {
        match &self.kind {
            FeatureKind::Numeric { .. } => 1,
            FeatureKind::Categorical { categories } => categories.len(),
        }
    }

    /// Trained vocabulary, if categorical
    pub fn categories(&self) -> Option<&[String]> {
        match &self.kind {
            FeatureKind::Categorical { categories } => Some(categories.as_slice()),
            FeatureKind::Numeric { .. } => None,
        }
    }

    fn encode_into(&self, value: FeatureValue<'_>, row: &mut Vec<f64>) -> Result<()> {
        match (&self.kind, value) {
            (FeatureKind::Numeric { mean, scale }, FeatureValue::Numeric(x)) => {
                if !x.is_finite() {
                    return Err(RiskError::schema_mismatch(&self.name, "value is not finite"));
                }
                row.push((x - mean) / scale);
            }
            (FeatureKind::Categorical { categories }, FeatureValue::Categorical(s)) => {
                let hit = categories.iter().position(|c| c == s).ok_or_else(|| {
                    RiskError::schema_mismatch(
                        &self.name,
                        format!(
                            "unknown category '{}' (expected one of: {})",
                            s,
                            categories.join(", ")
                        ),
                    )
                })?;
                row.extend((0..categories.len()).map(|i| if i == hit { 1.0 } else { 0.0 }));
            }
            (FeatureKind::Numeric { .. }, FeatureValue::Categorical(_)) => {
                return Err(RiskError::schema_mismatch(
                    &self.name,
                    "model expects a numeric value",
                ));
            }
            (FeatureKind::Categorical { .. }, FeatureValue::Numeric(_)) => {
                return Err(RiskError::schema_mismatch(
                    &self.name,
                    "model expects a categorical value",
                ));
            }
        }
        Ok(())
    }
}

/// Total encoded width of a schema
pub fn encoded_width(schema: &[FeatureSpec]) -> usize {
    schema.iter().map(FeatureSpec::width).sum()
}

/// Encode a record in schema order
pub fn encode(schema: &[FeatureSpec], record: &FeatureRecord) -> Result<Vec<f64>> {
    let mut row = Vec::with_capacity(encoded_width(schema));
    for spec in schema {
        let value = record.value(&spec.name).ok_or_else(|| {
            RiskError::schema_mismatch(&spec.name, "feature is not part of the request record")
        })?;
        spec.encode_into(value, &mut row)?;
    }
    Ok(row)
}
