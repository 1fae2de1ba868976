//! Command-line argument parsing for premiumrisk
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::types::features::{HEIGHT_RANGE, INCOME_RANGE, WEIGHT_RANGE};
use crate::types::{Occupation, RawUserInput};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// premiumrisk - Insurance premium risk prediction service and client
#[derive(Parser, Debug)]
#[command(name = "premiumrisk")]
#[command(version)]
#[command(about = "Estimate an insurance premium risk category from health and lifestyle attributes", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Prediction service URL (overrides BACKEND_URL and the config file)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the prediction service
    Serve(ServeArgs),

    /// Submit one quote request from flags
    Quote(QuoteArgs),

    /// Fill in the quote form interactively
    Form,

    /// Query the prediction service health endpoint
    Health,

    /// Run diagnostics on config, model artifact and backend
    Doctor,

    /// Display current configuration
    Config,
}

/// Overrides for `serve`
#[derive(ClapArgs, Debug, Default)]
pub struct ServeArgs {
    /// Bind host
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port
    #[arg(long)]
    pub port: Option<u16>,

    /// Model artifact path
    #[arg(long)]
    pub model: Option<PathBuf>,
}

/// Raw attributes for `quote`
#[derive(ClapArgs, Debug)]
pub struct QuoteArgs {
    /// Age in years
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(18..=100))]
    pub age: u32,

    /// Weight in kg
    #[arg(long, default_value_t = 70.0, value_parser = weight_in_range)]
    pub weight: f64,

    /// Height in metres
    #[arg(long, default_value_t = 1.75, value_parser = height_in_range)]
    pub height: f64,

    /// Annual income in lakh per annum
    #[arg(long, default_value_t = 10.0, value_parser = income_in_range)]
    pub income_lpa: f64,

    /// Occupation, e.g. "Private Job" or private_job
    #[arg(long, default_value = "Private Job", value_parser = parse_occupation)]
    pub occupation: Occupation,

    /// City of residence
    #[arg(long, default_value = "Mumbai")]
    pub city: String,

    /// Smoker
    #[arg(long)]
    pub smoker: bool,
}

impl QuoteArgs {
    /// Collect the flags into form input
    pub fn to_input(&self) -> RawUserInput {
        RawUserInput {
            age: self.age,
            weight_kg: self.weight,
            height_m: self.height,
            income_lpa: self.income_lpa,
            smoker: self.smoker,
            city: crate::types::features::normalize_city(&self.city),
            occupation: self.occupation,
        }
    }
}

fn float_in_range(s: &str, range: &RangeInclusive<f64>) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !range.contains(&value) {
        return Err(format!(
            "{} is not in {}..={}",
            value,
            range.start(),
            range.end()
        ));
    }
    Ok(value)
}

fn weight_in_range(s: &str) -> Result<f64, String> {
    float_in_range(s, &WEIGHT_RANGE)
}

fn height_in_range(s: &str) -> Result<f64, String> {
    float_in_range(s, &HEIGHT_RANGE)
}

fn income_in_range(s: &str) -> Result<f64, String> {
    float_in_range(s, &INCOME_RANGE)
}

fn parse_occupation(s: &str) -> Result<Occupation, String> {
    Occupation::parse(s).map_err(|e| e.to_string())
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("premiumrisk").chain(argv.iter().copied()))
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["-q", "health"]).unwrap().verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["health"]).unwrap().verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["-v", "health"]).unwrap().verbosity(), Verbosity::Verbose);
        assert_eq!(
            parse(&["health", "-vv"]).unwrap().verbosity(),
            Verbosity::VeryVerbose
        );
    }

    #[test]
    fn test_quote_defaults() {
        let args = parse(&["quote"]).unwrap();
        let Commands::Quote(quote) = args.command else {
            panic!("expected quote");
        };
        let input = quote.to_input();
        assert_eq!(input, RawUserInput::default());
    }

    #[test]
    fn test_quote_age_bounds() {
        assert!(parse(&["quote", "--age", "18"]).is_ok());
        assert!(parse(&["quote", "--age", "100"]).is_ok());
        assert!(parse(&["quote", "--age", "17"]).is_err());
        assert!(parse(&["quote", "--age", "101"]).is_err());
    }

    #[test]
    fn test_quote_float_bounds() {
        assert!(parse(&["quote", "--weight", "29"]).is_err());
        assert!(parse(&["quote", "--height", "3.0"]).is_err());
        assert!(parse(&["quote", "--income-lpa", "abc"]).is_err());
        assert!(parse(&["quote", "--income-lpa", "0"]).is_ok());
    }

    #[test]
    fn test_quote_occupation_and_city() {
        let args = parse(&[
            "quote",
            "--occupation",
            "business owner",
            "--city",
            "  new delhi",
            "--smoker",
        ])
        .unwrap();
        let Commands::Quote(quote) = args.command else {
            panic!("expected quote");
        };
        let input = quote.to_input();
        assert_eq!(input.occupation, Occupation::BusinessOwner);
        assert_eq!(input.city, "New Delhi");
        assert!(input.smoker);
        assert!(parse(&["quote", "--occupation", "pilot"]).is_err());
    }

    #[test]
    fn test_global_backend_url() {
        let args = parse(&["health", "--backend-url", "http://10.0.0.2:8000"]).unwrap();
        assert_eq!(args.backend_url.as_deref(), Some("http://10.0.0.2:8000"));
    }

    #[test]
    fn test_serve_overrides() {
        let args = parse(&["serve", "--port", "9000", "--model", "m.json"]).unwrap();
        let Commands::Serve(serve) = args.command else {
            panic!("expected serve");
        };
        assert_eq!(serve.port, Some(9000));
        assert_eq!(serve.model, Some(PathBuf::from("m.json")));
        assert!(serve.host.is_none());
    }
}
