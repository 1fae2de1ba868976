//! HTTP mapping for service errors

use crate::errors::RiskError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// A `RiskError` on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub RiskError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RiskError::SchemaValidation(_) | RiskError::SchemaMismatch { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            RiskError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RiskError> for ApiError {
    fn from(err: RiskError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(RiskError::SchemaValidation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.0, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }

        let detail = match self.0 {
            RiskError::SchemaValidation(msg) => msg,
            other => other.to_string(),
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}
