//! Shared helpers for integration tests

#![allow(dead_code)]

use axum::Router;
use premiumrisk::server::{self, AppState};
use premiumrisk::{FeatureRecord, InferenceAdapter};
use std::path::PathBuf;
use tokio::net::TcpListener;

pub fn demo_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/model.json")
}

pub fn loaded_adapter() -> InferenceAdapter {
    InferenceAdapter::try_load(demo_model_path()).expect("demo model loads")
}

/// Start the prediction service on an ephemeral port
pub async fn spawn_service(adapter: InferenceAdapter) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server::serve_on(listener, AppState::new(adapter), std::future::pending()).await
    });
    format!("http://{}", addr)
}

/// Start an arbitrary router on an ephemeral port
pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await });
    format!("http://{}", addr)
}

/// An address nothing listens on
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// 35-year-old private employee in Mumbai, BMI ~22.9, non-smoker, 12 LPA
pub fn scenario_record() -> FeatureRecord {
    FeatureRecord {
        bmi: 22.86,
        age_group: "26-35".to_string(),
        lifestyle_risk: "low".to_string(),
        city_tier: "1".to_string(),
        income_lpa: 12.0,
        occupation: "private_job".to_string(),
    }
}
