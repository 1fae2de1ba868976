//! Serialized model artifact
//!
//! A JSON document carrying the class labels, the training-time feature
//! schema and the estimator. Loaded once and validated up front so that
//! inference never has to re-check dimensions.

use crate::errors::{RiskError, Result};
use crate::model::encoder::{self, FeatureKind, FeatureSpec};
use crate::model::estimator::{Estimator, EstimatorSpec};
use crate::types::FeatureRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

fn default_name() -> String {
    "model".to_string()
}

/// A pre-trained classifier and its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default = "default_name")]
    pub name: String,
    /// Class labels in the order the estimator emits probabilities
    pub classes: Vec<String>,
    pub features: Vec<FeatureSpec>,
    pub estimator: EstimatorSpec,
}

impl ModelArtifact {
    /// Read and validate an artifact file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let artifact = Self::from_json(&contents)?;

        info!(
            model = %artifact.name,
            path = %path.display(),
            estimator = artifact.estimator.kind(),
            classes = ?artifact.classes,
            "Model artifact loaded"
        );

        Ok(artifact)
    }

    /// Parse and validate an artifact from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)
            .map_err(|e| RiskError::ArtifactInvalid(format!("failed to parse artifact: {}", e)))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check the artifact is internally consistent and fits `FeatureRecord`
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(RiskError::ArtifactInvalid("no class labels".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.classes.iter().find(|c| !seen.insert(c.as_str())) {
            return Err(RiskError::ArtifactInvalid(format!(
                "duplicate class label '{}'",
                dup
            )));
        }

        let mut names = HashSet::new();
        for spec in &self.features {
            if !names.insert(spec.name.as_str()) {
                return Err(RiskError::ArtifactInvalid(format!(
                    "feature '{}' declared twice",
                    spec.name
                )));
            }
            self.validate_feature(spec)?;
        }
        if let Some(missing) = FeatureRecord::FIELDS.iter().find(|f| !names.contains(*f)) {
            return Err(RiskError::ArtifactInvalid(format!(
                "schema is missing feature '{}'",
                missing
            )));
        }

        self.estimator
            .validate(encoder::encoded_width(&self.features), self.classes.len())
    }

    fn validate_feature(&self, spec: &FeatureSpec) -> Result<()> {
        if !FeatureRecord::FIELDS.contains(&spec.name.as_str()) {
            return Err(RiskError::ArtifactInvalid(format!(
                "unknown feature '{}'",
                spec.name
            )));
        }
        match &spec.kind {
            FeatureKind::Numeric { mean, scale } => {
                if !FeatureRecord::is_numeric_field(&spec.name) {
                    return Err(RiskError::ArtifactInvalid(format!(
                        "feature '{}' must be categorical",
                        spec.name
                    )));
                }
                if !mean.is_finite() || !scale.is_finite() || *scale == 0.0 {
                    return Err(RiskError::ArtifactInvalid(format!(
                        "feature '{}' has an unusable mean/scale",
                        spec.name
                    )));
                }
            }
            FeatureKind::Categorical { categories } => {
                if FeatureRecord::is_numeric_field(&spec.name) {
                    return Err(RiskError::ArtifactInvalid(format!(
                        "feature '{}' must be numeric",
                        spec.name
                    )));
                }
                if categories.is_empty() {
                    return Err(RiskError::ArtifactInvalid(format!(
                        "feature '{}' has an empty vocabulary",
                        spec.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Class labels in model order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Training-time feature schema
    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    /// Trained vocabulary for a categorical feature
    pub fn vocabulary(&self, feature: &str) -> Option<&[String]> {
        self.features
            .iter()
            .find(|f| f.name == feature)
            .and_then(FeatureSpec::categories)
    }

    /// Encode and score one record in a single pass
    pub fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>> {
        let row = encoder::encode(&self.features, record)?;
        self.estimator.predict_proba(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TINY: &str = r#"{
        "name": "tiny",
        "classes": ["High", "Low"],
        "features": [
            {"name": "bmi", "kind": "numeric", "mean": 25.0, "scale": 5.0},
            {"name": "age_group", "kind": "categorical", "categories": ["young", "old"]},
            {"name": "lifestyle_risk", "kind": "categorical", "categories": ["low", "high"]},
            {"name": "city_tier", "kind": "categorical", "categories": ["1", "2"]},
            {"name": "income_lpa", "kind": "numeric"},
            {"name": "occupation", "kind": "categorical", "categories": ["student"]}
        ],
        "estimator": {
            "type": "logistic",
            "coefficients": [[1, 0, 0, 0, 1, 0, 0, -0.1, 0], [-1, 0, 0, 0, -1, 0, 0, 0.1, 0]],
            "intercepts": [0, 0]
        }
    }"#;

    #[test]
    fn test_parse_and_validate() {
        let artifact = ModelArtifact::from_json(TINY).unwrap();
        assert_eq!(artifact.classes(), &["High".to_string(), "Low".to_string()]);
        assert_eq!(encoder::encoded_width(artifact.features()), 9);
        assert_eq!(
            artifact.vocabulary("city_tier"),
            Some(&["1".to_string(), "2".to_string()][..])
        );
        assert_eq!(artifact.vocabulary("bmi"), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(TINY.as_bytes()).unwrap();

        let artifact = ModelArtifact::load(&path).unwrap();
        assert_eq!(artifact.name, "tiny");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ModelArtifact::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, RiskError::Io(_)));
    }

    #[test]
    fn test_rejects_width_mismatch() {
        let broken = TINY.replace("[-1, 0, 0, 0, -1, 0, 0, 0.1, 0]", "[-1, 0]");
        assert!(matches!(
            ModelArtifact::from_json(&broken),
            Err(RiskError::ArtifactInvalid(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_classes() {
        let broken = TINY.replace(r#"["High", "Low"]"#, r#"["High", "High"]"#);
        assert!(ModelArtifact::from_json(&broken).is_err());
    }

    #[test]
    fn test_rejects_missing_feature() {
        let broken = TINY.replace(
            r#"{"name": "occupation", "kind": "categorical", "categories": ["student"]}"#,
            r#"{"name": "bmi", "kind": "numeric"}"#,
        );
        assert!(ModelArtifact::from_json(&broken).is_err());
    }

    #[test]
    fn test_rejects_wrong_kind() {
        let broken = TINY.replace(
            r#"{"name": "income_lpa", "kind": "numeric"}"#,
            r#"{"name": "income_lpa", "kind": "categorical", "categories": ["x"]}"#,
        );
        assert!(ModelArtifact::from_json(&broken).is_err());
    }

    #[test]
    fn test_predict_proba_single_pass() {
        let artifact = ModelArtifact::from_json(TINY).unwrap();
        let record = FeatureRecord {
            bmi: 35.0,
            age_group: "old".to_string(),
            lifestyle_risk: "high".to_string(),
            city_tier: "1".to_string(),
            income_lpa: 3.0,
            occupation: "student".to_string(),
        };
        let probs = artifact.predict_proba(&record).unwrap();
        assert_eq!(probs.len(), 2);
        assert!(probs[0] > probs[1]);
    }
}
