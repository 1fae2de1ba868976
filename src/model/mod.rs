//! Model artifact module
//!
//! Everything needed to turn a JSON artifact on disk into class
//! probabilities: schema encoding, estimator families, and loading.

pub mod artifact;
pub mod encoder;
pub mod estimator;

pub use artifact::ModelArtifact;
pub use encoder::{FeatureKind, FeatureSpec};
pub use estimator::{Estimator, EstimatorSpec, ForestModel, LogisticModel};

/// Version reported by `/health`
pub const MODEL_VERSION: &str = "1.0.0";
