//! Logging setup for premiumrisk
//!
//! Installs a `tracing-subscriber` formatter writing to stderr. `RUST_LOG`
//! wins when set; otherwise the level comes from config and `-v`/`-q`.

use crate::cli::config::LoggingConfig;
use crate::cli::Verbosity;
use crate::errors::{RiskError, Result};
use tracing_subscriber::EnvFilter;

/// Level the client runs at by default so log lines don't interleave with the form
pub const CLIENT_LOG_LEVEL: &str = "warn";

/// Effective level after applying the verbosity flags
pub fn effective_level(base: &str, verbosity: Verbosity) -> &str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => base,
        Verbosity::Verbose => "debug",
        Verbosity::VeryVerbose => "trace",
    }
}

/// Filter directive for a level, keeping the HTTP stack's internals quiet
pub fn filter_directive(level: &str) -> String {
    format!("{},hyper=warn,reqwest=warn,rustyline=warn", level)
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init_logging(logging: &LoggingConfig, base_level: &str, verbosity: Verbosity) -> Result<()> {
    let directive = filter_directive(effective_level(base_level, verbosity));
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .map_err(|e| RiskError::ConfigError(format!("Invalid log filter: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    // Err only means a subscriber is already installed
    let _ = match logging.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.try_init(),
    };

    Ok(())
}
