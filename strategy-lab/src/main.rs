use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use pipeline_core::args::{CommonArgs, ThresholdArgs};
use pipeline_core::{MetricTableLoader, ResultPublisher};
use strategy_lab::{run, SimulationParams};

/// Monte Carlo strategy simulation over the latest inference results.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    thresholds: ThresholdArgs,

    /// Simulate over live inference results instead of staging
    #[arg(long)]
    live: bool,

    /// Overrides the number of trials per strategy
    #[arg(long)]
    trials: Option<usize>,

    /// Overrides the random seed
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli
        .common
        .load_config()
        .context("Failed to load pipeline configuration")?;
    let thresholds = cli
        .thresholds
        .thresholds()
        .context("Invalid threshold override")?;

    let mut params = SimulationParams::from_settings(config.settings());
    if let Some(trials) = cli.trials {
        params.trials_per_strategy = trials;
    }
    if let Some(seed) = cli.seed {
        params.seed = seed;
    }

    info!(
        "Starting strategy simulation: bucket {}, {} trials per strategy, {} results",
        config.bucket(),
        params.trials_per_strategy,
        if cli.live { "live" } else { "staging" }
    );

    let bucket = config.open_bucket();
    let loader = MetricTableLoader::new(bucket.clone());
    let publisher = ResultPublisher::new(bucket);

    let report = match run(&loader, &publisher, &params, &thresholds, cli.live).await {
        Ok(report) => report,
        Err(e) => bail!("Strategy simulation stopped: {}", e),
    };

    if let Some(e) = &report.publish_error {
        warn!("Results were not published: {}", e);
    }
    match report.verdict() {
        Some(strategy) => info!("Selected strategy: {}", strategy),
        None => info!("No strategy selected"),
    }
    Ok(())
}
