//! CLI module for premiumrisk
//!
//! Handles command-line argument parsing and configuration management.

pub mod args;
pub mod config;

pub use args::{Args, Commands, QuoteArgs, ServeArgs, Verbosity};
pub use config::Config;
