//! Type definitions module
//!
//! Records exchanged between the client, the HTTP service and the model.

pub mod features;
pub mod prediction;

// Re-export commonly used types
pub use features::{FeatureRecord, FeatureValue, Occupation, RawUserInput};
pub use prediction::{ClassProbabilities, PredictionResult};
