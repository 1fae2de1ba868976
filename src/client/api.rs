//! HTTP client for the prediction service
//!
//! One request per call, bounded by the configured timeout. Failures are
//! classified into the upstream error variants; nothing is retried.

use crate::errors::{RiskError, Result};
use crate::server::HealthResponse;
use crate::types::{FeatureRecord, PredictionResult};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default request timeout (5 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Prediction service client
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl PredictionClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RiskError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST /predict
    pub async fn predict(&self, record: &FeatureRecord) -> Result<PredictionResult> {
        let url = format!("{}/predict", self.base_url);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let result: PredictionResult = self.decode(response).await?;
        debug!(
            predicted_category = %result.predicted_category,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prediction received"
        );
        Ok(result)
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        check_status(response.status())?;

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| RiskError::InvalidResponse(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> RiskError {
        if err.is_timeout() {
            RiskError::UpstreamTimeout {
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else if err.is_connect() {
            RiskError::UpstreamUnreachable(err.to_string())
        } else if err.is_decode() {
            RiskError::InvalidResponse(err.to_string())
        } else {
            RiskError::Http(err)
        }
    }
}

/// Map a response status onto the upstream error variants
pub fn check_status(status: StatusCode) -> Result<()> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            Err(RiskError::UpstreamTransient {
                status: status.as_u16(),
            })
        }
        other => Err(RiskError::UnexpectedServerStatus {
            status: other.as_u16(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PredictionClient::new("http://localhost:8000/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK).is_ok());
        for code in [502, 503, 504] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(matches!(
                check_status(status),
                Err(RiskError::UpstreamTransient { status }) if status == code
            ));
        }
        assert!(matches!(
            check_status(StatusCode::UNPROCESSABLE_ENTITY),
            Err(RiskError::UnexpectedServerStatus { status: 422 })
        ));
        assert!(matches!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(RiskError::UnexpectedServerStatus { status: 500 })
        ));
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client =
            PredictionClient::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, RiskError::UpstreamUnreachable(_)), "{err:?}");
    }
}
