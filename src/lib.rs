//! premiumrisk - Insurance premium risk prediction
//!
//! A prediction service and its terminal client:
//!
//! - **model** / **inference**: load a JSON model artifact and turn a
//!   feature record into per-class probabilities
//! - **server**: axum service exposing `/`, `/health` and `/predict`
//! - **features**: derive the model's features from raw form attributes
//! - **client**: quote form, HTTP client and result rendering
//! - **cli** / **telemetry** / **doctor**: command line, logging, diagnostics

pub mod errors;
pub mod types;

// Model side
pub mod inference;
pub mod model;
pub mod server;

// Client side
pub mod client;
pub mod features;

// Interface layer
pub mod cli;
pub mod doctor;
pub mod telemetry;

// Re-export commonly used types
pub use errors::{Result, RiskError};
pub use inference::InferenceAdapter;
pub use types::{FeatureRecord, PredictionResult, RawUserInput};
