//! Route handlers for the prediction service

use crate::errors::RiskError;
use crate::model::MODEL_VERSION;
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::types::{FeatureRecord, PredictionResult};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

pub const WELCOME_MESSAGE: &str = "Welcome to the Insurance Premium Prediction API!";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn is_model_loaded(&self) -> bool {
        self.model_status == "loaded"
    }
}

/// GET /
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_status = if state.adapter.is_loaded() {
        "loaded"
    } else {
        "not loaded"
    };
    Json(HealthResponse {
        status: "OK".to_string(),
        model_status: model_status.to_string(),
        version: MODEL_VERSION.to_string(),
    })
}

/// POST /predict
#[tracing::instrument(name = "predict", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FeatureRecord>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(record) = payload?;
    validate_record(&record)?;

    let started = Instant::now();
    let result = state.adapter.predict(&record)?;

    info!(
        predicted_category = %result.predicted_category,
        confidence = result.confidence,
        latency_us = started.elapsed().as_micros() as u64,
        "Prediction served"
    );

    Ok(Json(result))
}

/// Range checks serde cannot express
fn validate_record(record: &FeatureRecord) -> Result<(), RiskError> {
    if !(record.bmi.is_finite() && record.bmi > 0.0) {
        return Err(RiskError::SchemaValidation(format!(
            "bmi must be a positive number, got {}",
            record.bmi
        )));
    }
    if !(record.income_lpa.is_finite() && record.income_lpa >= 0.0) {
        return Err(RiskError::SchemaValidation(format!(
            "income_lpa must be a non-negative number, got {}",
            record.income_lpa
        )));
    }
    Ok(())
}
