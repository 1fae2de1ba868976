//! Prediction service
//!
//! Exposes the inference adapter over HTTP:
//! - `GET /` welcome message
//! - `GET /health` liveness plus model status and version
//! - `POST /predict` feature record in, prediction out

pub mod error;
pub mod handlers;

pub use error::{ApiError, ErrorBody};
pub use handlers::{HealthResponse, MessageResponse, WELCOME_MESSAGE};

use crate::cli::config::Config;
use crate::errors::Result;
use crate::inference::InferenceAdapter;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// State shared by every handler; the adapter is read-only after startup
#[derive(Debug, Clone)]
pub struct AppState {
    pub adapter: Arc<InferenceAdapter>,
}

impl AppState {
    pub fn new(adapter: InferenceAdapter) -> Self {
        Self {
            adapter: Arc::new(adapter),
        }
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Load the model according to config
pub fn load_adapter(config: &Config) -> Result<InferenceAdapter> {
    let path = &config.model.artifact_path;
    if config.model.required {
        return InferenceAdapter::try_load(path);
    }

    let adapter = InferenceAdapter::load(path);
    if !adapter.is_loaded() {
        warn!(
            path = %path.display(),
            "Starting without a model; /predict will answer 503"
        );
    }
    Ok(adapter)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Load the model, bind, and serve until Ctrl+C
pub async fn serve(config: &Config) -> Result<()> {
    let adapter = load_adapter(config)?;
    let model_loaded = adapter.is_loaded();

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(
        addr = %listener.local_addr()?,
        model_loaded,
        "Prediction service listening"
    );

    serve_on(listener, AppState::new(adapter), shutdown_signal()).await?;
    info!("Prediction service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
