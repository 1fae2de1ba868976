//! Configuration management for premiumrisk
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.premiumrisk/config.toml (or `--config PATH`)

use crate::errors::{RiskError, Result};
use crate::features::FeatureRules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable that overrides the client's backend address
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Backend address used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Complete configuration for premiumrisk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub rules: FeatureRules,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Prediction service bind address
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Model artifact location and startup policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
    /// Refuse to start when the artifact cannot be loaded
    pub required: bool,
}

/// Client connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend_url: String,
    pub timeout_secs: u64,
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn, error
    pub level: String,
    /// pretty or json
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("models/model.json"),
            required: false,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RiskError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| RiskError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// ~/.premiumrisk/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".premiumrisk").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(RiskError::ConfigError(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.client.timeout_secs == 0 {
            return Err(RiskError::ConfigError(
                "client.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if !self.client.backend_url.starts_with("http://")
            && !self.client.backend_url.starts_with("https://")
        {
            return Err(RiskError::ConfigError(format!(
                "client.backend_url must be an http(s) URL: {}",
                self.client.backend_url
            )));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(RiskError::ConfigError(format!(
                    "Invalid log level: {}",
                    other
                )))
            }
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(RiskError::ConfigError(format!(
                    "Invalid log format: {}",
                    other
                )))
            }
        }

        self.rules.validate()
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RiskError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Backend address: CLI flag, then `BACKEND_URL`, then the config file
    pub fn backend_url(&self, cli_override: Option<&str>) -> String {
        resolve_backend_url(
            cli_override,
            std::env::var(BACKEND_URL_ENV).ok().as_deref(),
            &self.client.backend_url,
        )
    }

    /// Client request timeout
    pub fn client_timeout(&self) -> Duration {
        Duration::from_secs(self.client.timeout_secs)
    }

    /// Server bind address as "host:port"
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Pick the first non-blank candidate; trailing slashes are dropped
pub fn resolve_backend_url(cli: Option<&str>, env: Option<&str>, configured: &str) -> String {
    [cli, env]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(configured)
        .trim_end_matches('/')
        .to_string()
}
