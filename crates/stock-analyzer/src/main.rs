mod cli;
mod output;

use std::fs;
use std::path::Path;

use analysis_core::{AnalysisRequest, ScoringConfig};
use analysis_orchestrator::AnalysisOrchestrator;
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(error) = run() {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stock_analyzer=info,analysis_orchestrator=info".into());

    // stdout carries the report
    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ScoringConfig::default(),
    };
    let request = load_request(&cli.request)?;

    let orchestrator = AnalysisOrchestrator::new(config)
        .context("invalid scoring configuration")?
        .with_charts(cli.charts);
    let report = orchestrator
        .analyze(&request)
        .with_context(|| format!("failed to analyze {}", request.symbol))?;

    output::render(&report, cli.format, cli.pretty, cli.explain)
}

fn load_config(path: &Path) -> Result<ScoringConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = ScoringConfig::from_json_str(&raw)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    tracing::info!("Loaded scoring config from {}", path.display());
    Ok(config)
}

fn load_request(path: &Path) -> Result<AnalysisRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read request {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed request {}", path.display()))
}
