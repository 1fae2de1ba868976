//! premiumrisk - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use premiumrisk::{
    cli::{Args, Commands, Config, QuoteArgs, ServeArgs},
    client::{self, PredictionClient, QuoteForm, Submission, TerminalReader},
    doctor::Doctor,
    server,
    telemetry::{self, CLIENT_LOG_LEVEL},
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    let base_level = match args.command {
        Commands::Serve(_) => config.logging.level.clone(),
        _ => CLIENT_LOG_LEVEL.to_string(),
    };
    telemetry::init_logging(&config.logging, &base_level, args.verbosity())?;

    match &args.command {
        Commands::Serve(serve_args) => run_server(config, serve_args).await?,
        Commands::Quote(quote_args) => run_quote(&args, &config, quote_args).await?,
        Commands::Form => run_form(&args, &config).await?,
        Commands::Health => show_health(&args, &config).await?,
        Commands::Doctor => run_doctor(&args, config).await?,
        Commands::Config => show_config(&args, &config)?,
    }

    Ok(())
}

async fn run_server(mut config: Config, overrides: &ServeArgs) -> Result<()> {
    if let Some(host) = &overrides.host {
        config.server.host = host.clone();
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(model) = &overrides.model {
        config.model.artifact_path = model.clone();
    }
    config.validate()?;

    server::serve(&config).await?;
    Ok(())
}

fn build_client(args: &Args, config: &Config) -> Result<PredictionClient> {
    let url = config.backend_url(args.backend_url.as_deref());
    Ok(PredictionClient::new(&url, config.client_timeout())?)
}

async fn run_quote(args: &Args, config: &Config, quote: &QuoteArgs) -> Result<()> {
    let client = build_client(args, config)?;
    let input = quote.to_input();

    let state = client::run_quote(
        &client,
        &config.rules,
        &input,
        &mut Submission::new(),
        args.verbosity().show_progress(),
    )
    .await?;

    std::process::exit(if state.is_success() { 0 } else { 1 });
}

async fn run_form(args: &Args, config: &Config) -> Result<()> {
    let client = build_client(args, config)?;
    let mut form = QuoteForm::new(TerminalReader::new()?);

    client::run_form(
        &client,
        &config.rules,
        &mut form,
        args.verbosity().show_progress(),
    )
    .await?;
    Ok(())
}

async fn show_health(args: &Args, config: &Config) -> Result<()> {
    let client = build_client(args, config)?;

    match client.health().await {
        Ok(health) => {
            println!("Backend: {}", client.base_url());
            println!("  Status:  {}", health.status.green());
            let model = if health.is_model_loaded() {
                health.model_status.green()
            } else {
                health.model_status.yellow()
            };
            println!("  Model:   {}", model);
            println!("  Version: {}", health.version);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e);
            std::process::exit(1);
        }
    }
}

async fn run_doctor(args: &Args, config: Config) -> Result<()> {
    let backend_url = config.backend_url(args.backend_url.as_deref());
    let doctor = Doctor::new(config, backend_url);

    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::overall_status(&checks) { 0 } else { 1 });
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    println!("{}", "premiumrisk Configuration".bold().cyan());
    if let Some(path) = &args.config {
        println!("# loaded from: {}", path.display());
    } else if let Some(path) = Config::default_path() {
        println!("# default location: {}", path.display());
    }
    println!("# effective backend: {}", config.backend_url(args.backend_url.as_deref()));
    println!("# verbosity: {}\n", args.verbosity().as_str());

    println!("{}", config.to_toml()?);
    Ok(())
}
