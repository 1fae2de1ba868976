//! Doctor command for system diagnostics
//!
//! Checks the local config and model artifact, then the configured backend.

use crate::cli::config::Config;
use crate::client::PredictionClient;
use crate::errors::RiskError;
use crate::model::ModelArtifact;
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

/// Health check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Pass,
    Warn(String),
    Fail(String),
}

/// Individual health check
#[derive(Debug)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}

/// Doctor diagnostics system
pub struct Doctor {
    config: Config,
    backend_url: String,
}

impl Doctor {
    /// Create a new doctor instance
    pub fn new(config: Config, backend_url: String) -> Self {
        Self {
            config,
            backend_url,
        }
    }

    /// Run all health checks
    pub async fn run_diagnostics(&self) -> Vec<HealthCheck> {
        let mut checks = vec![self.check_config(), self.check_artifact()];

        let client = PredictionClient::new(&self.backend_url, Duration::from_secs(3));
        match client {
            Ok(client) => checks.extend(self.check_backend(&client).await),
            Err(e) => checks.push(HealthCheck::new(
                "Backend",
                HealthStatus::Fail(format!("Cannot build HTTP client: {}", e)),
            )),
        }

        checks
    }

    /// Check 1: config values
    fn check_config(&self) -> HealthCheck {
        match self.config.validate() {
            Ok(()) => HealthCheck::new("Config", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Config", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Check 2: model artifact present and valid
    fn check_artifact(&self) -> HealthCheck {
        let path: &PathBuf = &self.config.model.artifact_path;
        if !path.exists() {
            let message = format!("{} not found", path.display());
            let status = if self.config.model.required {
                HealthStatus::Fail(message)
            } else {
                HealthStatus::Warn(message)
            };
            return HealthCheck::new("Model Artifact", status);
        }

        match ModelArtifact::load(path) {
            Ok(_) => HealthCheck::new("Model Artifact", HealthStatus::Pass),
            Err(e) => HealthCheck::new("Model Artifact", HealthStatus::Fail(e.to_string())),
        }
    }

    /// Checks 3 and 4: backend reachable, backend model loaded
    async fn check_backend(&self, client: &PredictionClient) -> Vec<HealthCheck> {
        match client.health().await {
            Ok(health) => {
                let model = if health.is_model_loaded() {
                    HealthStatus::Pass
                } else {
                    HealthStatus::Warn("Backend is up but has no model loaded".to_string())
                };
                vec![
                    HealthCheck::new("Backend", HealthStatus::Pass),
                    HealthCheck::new("Backend Model", model),
                ]
            }
            Err(e) => {
                let status = match e {
                    RiskError::UpstreamTransient { .. } => {
                        HealthStatus::Warn(format!("{} (may be waking up)", e))
                    }
                    other => HealthStatus::Fail(other.to_string()),
                };
                vec![
                    HealthCheck::new("Backend", status),
                    HealthCheck::new(
                        "Backend Model",
                        HealthStatus::Warn("Skipped, backend not healthy".to_string()),
                    ),
                ]
            }
        }
    }

    /// Display diagnostics results
    pub fn display_results(checks: &[HealthCheck]) {
        println!("\n{}\n", "🔍 premiumrisk Diagnostics".bold());
        println!("{:<20} Status", "Check");
        println!("{}", "=".repeat(50));

        for check in checks {
            let line = match &check.status {
                HealthStatus::Pass => "✅ PASS".green(),
                HealthStatus::Warn(msg) => format!("⚠️  WARN: {}", msg).yellow(),
                HealthStatus::Fail(msg) => format!("❌ FAIL: {}", msg).red(),
            };
            println!("{:<20} {}", check.name, line);
        }

        println!();
    }

    /// Get overall health status
    pub fn overall_status(checks: &[HealthCheck]) -> bool {
        !checks.iter().any(|c| matches!(c.status, HealthStatus::Fail(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dead_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    #[test]
    fn test_health_status_equality() {
        assert_eq!(HealthStatus::Pass, HealthStatus::Pass);
        assert_eq!(
            HealthStatus::Warn("test".to_string()),
            HealthStatus::Warn("test".to_string())
        );
        assert_ne!(
            HealthStatus::Fail("a".to_string()),
            HealthStatus::Fail("b".to_string())
        );
    }

    #[test]
    fn test_overall_status() {
        let checks = vec![
            HealthCheck::new("Test 1", HealthStatus::Pass),
            HealthCheck::new("Test 2", HealthStatus::Warn("warning".to_string())),
        ];
        assert!(Doctor::overall_status(&checks));

        let checks = vec![
            HealthCheck::new("Test 1", HealthStatus::Pass),
            HealthCheck::new("Test 2", HealthStatus::Fail("error".to_string())),
        ];
        assert!(!Doctor::overall_status(&checks));
    }

    #[test]
    fn test_missing_artifact_warns_unless_required() {
        let mut config = Config::default();
        config.model.artifact_path = PathBuf::from("nowhere/model.json");
        let doctor = Doctor::new(config.clone(), dead_url());
        assert!(matches!(doctor.check_artifact().status, HealthStatus::Warn(_)));

        config.model.required = true;
        let doctor = Doctor::new(config, dead_url());
        assert!(matches!(doctor.check_artifact().status, HealthStatus::Fail(_)));
    }

    #[test]
    fn test_demo_artifact_passes() {
        let mut config = Config::default();
        config.model.artifact_path =
            std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("models/model.json");
        let doctor = Doctor::new(config, dead_url());
        assert_eq!(doctor.check_artifact().status, HealthStatus::Pass);
        assert_eq!(doctor.check_config().status, HealthStatus::Pass);
    }

    #[tokio::test]
    async fn test_unreachable_backend_fails() {
        let doctor = Doctor::new(Config::default(), dead_url());
        let checks = doctor.run_diagnostics().await;
        let backend = checks.iter().find(|c| c.name == "Backend").unwrap();
        assert!(matches!(backend.status, HealthStatus::Fail(_)));
        assert!(!Doctor::overall_status(&checks));
    }
}
