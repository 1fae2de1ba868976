//! Inference adapter
//!
//! Wraps a loaded `ModelArtifact` and turns a `FeatureRecord` into a
//! `PredictionResult`. The artifact is immutable after load and shared
//! read-only, so no locking is needed.

use crate::errors::{RiskError, Result};
use crate::model::ModelArtifact;
use crate::types::{ClassProbabilities, FeatureRecord, PredictionResult};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error};

/// Decimal places kept in returned probabilities
pub const PROBABILITY_DECIMALS: i32 = 4;

/// Round to `PROBABILITY_DECIMALS` places
pub fn round_probability(p: f64) -> f64 {
    let factor = 10f64.powi(PROBABILITY_DECIMALS);
    (p * factor).round() / factor
}

/// Model-backed predictor shared across request handlers
#[derive(Debug, Clone, Default)]
pub struct InferenceAdapter {
    model: Option<Arc<ModelArtifact>>,
}

impl InferenceAdapter {
    /// Wrap an already loaded artifact
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        Self {
            model: Some(Arc::new(artifact)),
        }
    }

    /// Adapter with no model; every prediction fails with `ModelUnavailable`
    pub fn unloaded() -> Self {
        Self { model: None }
    }

    /// Load the artifact at `path`, falling back to the unloaded state on failure
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match ModelArtifact::load(path) {
            Ok(artifact) => Self::from_artifact(artifact),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load model artifact");
                Self::unloaded()
            }
        }
    }

    /// Load the artifact at `path`, propagating any failure
    pub fn try_load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_artifact(ModelArtifact::load(path)?))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&ModelArtifact> {
        self.model.as_deref()
    }

    /// Predict the risk category for one record
    pub fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult> {
        let model = self.model.as_ref().ok_or(RiskError::ModelUnavailable)?;
        let classes = model.classes();

        let probabilities = model.predict_proba(record)?;
        if probabilities.len() != classes.len() {
            return Err(RiskError::Inference(format!(
                "estimator returned {} probabilities for {} classes",
                probabilities.len(),
                classes.len()
            )));
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(RiskError::Inference(
                "estimator returned non-finite probabilities".to_string(),
            ));
        }

        // First index wins on ties.
        let best = probabilities
            .iter()
            .enumerate()
            .fold(0, |best, (i, p)| if *p > probabilities[best] { i } else { best });

        let rounded: Vec<(String, f64)> = classes
            .iter()
            .cloned()
            .zip(probabilities.iter().map(|p| round_probability(*p)))
            .collect();
        let class_probabilities = ClassProbabilities::new(rounded);
        let confidence = class_probabilities.max();

        debug!(
            predicted_category = %classes[best],
            confidence,
            "Prediction computed"
        );

        Ok(PredictionResult {
            predicted_category: classes[best].clone(),
            confidence,
            class_probabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_adapter() -> InferenceAdapter {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("models/model.json");
        InferenceAdapter::try_load(path).unwrap()
    }

    fn record(age_group: &str, lifestyle: &str, city: &str, occupation: &str) -> FeatureRecord {
        FeatureRecord {
            bmi: 24.5,
            age_group: age_group.to_string(),
            lifestyle_risk: lifestyle.to_string(),
            city_tier: city.to_string(),
            income_lpa: 12.0,
            occupation: occupation.to_string(),
        }
    }

    fn every_record(adapter: &InferenceAdapter) -> Vec<FeatureRecord> {
        let model = adapter.model().unwrap();
        let vocab = |name: &str| model.vocabulary(name).unwrap().to_vec();
        let mut records = Vec::new();
        for age in vocab("age_group") {
            for lifestyle in vocab("lifestyle_risk") {
                for city in vocab("city_tier") {
                    for occupation in vocab("occupation") {
                        records.push(record(&age, &lifestyle, &city, &occupation));
                    }
                }
            }
        }
        records
    }

    #[test]
    fn test_probabilities_are_a_distribution() {
        let adapter = demo_adapter();
        for rec in every_record(&adapter) {
            let result = adapter.predict(&rec).unwrap();
            let probs = &result.class_probabilities;
            assert_eq!(probs.len(), 3);
            assert!(probs.iter().all(|(_, p)| (0.0..=1.0).contains(&p)));
            assert!((probs.sum() - 1.0).abs() <= 0.001, "sum {}", probs.sum());
            assert_eq!(result.confidence, probs.max());
        }
    }

    #[test]
    fn test_predicted_category_is_argmax() {
        let adapter = demo_adapter();
        for rec in every_record(&adapter) {
            let result = adapter.predict(&rec).unwrap();
            assert_eq!(
                result.class_probabilities.get(&result.predicted_category),
                Some(result.confidence)
            );
        }
    }

    #[test]
    fn test_deterministic() {
        let adapter = demo_adapter();
        let rec = record("26-35", "low", "1", "private_job");
        assert_eq!(adapter.predict(&rec).unwrap(), adapter.predict(&rec).unwrap());
    }

    #[test]
    fn test_labels_follow_model_order() {
        let adapter = demo_adapter();
        let result = adapter.predict(&record("60+", "high", "3", "retired")).unwrap();
        let labels: Vec<&str> = result.class_probabilities.labels().collect();
        assert_eq!(labels, vec!["High", "Low", "Medium"]);
    }

    #[test]
    fn test_unloaded_model() {
        let adapter = InferenceAdapter::unloaded();
        assert!(!adapter.is_loaded());
        let err = adapter
            .predict(&record("26-35", "low", "1", "private_job"))
            .unwrap_err();
        assert!(matches!(err, RiskError::ModelUnavailable));
    }

    #[test]
    fn test_load_failure_falls_back_to_unloaded() {
        let adapter = InferenceAdapter::load("/nonexistent/model.json");
        assert!(!adapter.is_loaded());
    }

    #[test]
    fn test_unknown_category_is_schema_mismatch() {
        let adapter = demo_adapter();
        let err = adapter
            .predict(&record("26-35", "low", "1", "astronaut"))
            .unwrap_err();
        assert!(matches!(err, RiskError::SchemaMismatch { ref feature, .. } if feature == "occupation"));
    }

    #[test]
    fn test_round_probability() {
        assert_eq!(round_probability(0.123456), 0.1235);
        assert_eq!(round_probability(1.0), 1.0);
        assert_eq!(round_probability(0.0), 0.0);
    }
}
