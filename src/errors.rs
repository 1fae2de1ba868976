//! Error types for premiumrisk
//!
//! One error enum covers the model boundary, the HTTP service and the
//! client's network taxonomy, so every layer can propagate with `?`.

use thiserror::Error;

/// Main error type for premiumrisk
#[derive(Error, Debug)]
pub enum RiskError {
    /// Request body did not satisfy the declared schema
    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    /// Feature record does not fit the artifact's trained schema
    #[error("Feature '{feature}' does not match the model schema: {reason}")]
    SchemaMismatch { feature: String, reason: String },

    /// No model artifact is loaded in this process
    #[error("Model not loaded")]
    ModelUnavailable,

    /// Artifact parsed but is internally inconsistent
    #[error("Invalid model artifact: {0}")]
    ArtifactInvalid(String),

    /// Estimator produced an unusable probability vector
    #[error("Inference failed: {0}")]
    Inference(String),

    /// Tensor backend failure while scoring
    #[error("Tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Backend could not be reached at all
    #[error("Prediction service unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Backend did not answer within the client timeout
    #[error("Prediction service timed out after {duration_ms}ms")]
    UpstreamTimeout { duration_ms: u64 },

    /// Backend answered with a gateway-style status (502/503/504)
    #[error("Prediction service temporarily unavailable (HTTP {status})")]
    UpstreamTransient { status: u16 },

    /// Backend answered with any other non-success status
    #[error("Prediction service returned HTTP {status}")]
    UnexpectedServerStatus { status: u16 },

    /// Backend answered 200 with a body we could not decode
    #[error("Invalid response from prediction service: {0}")]
    InvalidResponse(String),

    /// Form value outside its accepted range
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Submission state machine misuse
    #[error("Invalid submission transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RiskError {
    /// Shorthand for a form validation failure
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        RiskError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a schema mismatch on one feature
    pub fn schema_mismatch(feature: &str, reason: impl Into<String>) -> Self {
        RiskError::SchemaMismatch {
            feature: feature.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for premiumrisk operations
pub type Result<T> = std::result::Result<T, RiskError>;
