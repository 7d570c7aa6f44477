use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use pipeline_core::config::PipelineConfig;
use pipeline_core::{MetricTableLoader, PreferencesStore, Strategy, ThresholdSet, UserPreferences};
use std::future::Future;

pub mod args;
pub mod launcher;
pub mod refresh;
pub mod views;

use args::{AdminCommand, Cli, Commands, UserCommand, WatchArgs};
use launcher::{Routine, RoutineLauncher};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli
        .common
        .load_config()
        .context("Failed to load pipeline configuration")?;
    info!("Dashboard connected to bucket {}", config.bucket());

    match cli.command {
        Commands::Admin { command } => admin(&config, command).await,
        Commands::User { command } => user(&config, command).await,
    }
}

async fn admin(config: &PipelineConfig, command: AdminCommand) -> Result<()> {
    let loader = MetricTableLoader::new(config.open_bucket());
    let launcher = RoutineLauncher::from_settings(config.settings());

    match command {
        AdminCommand::Show { thresholds, watch } => {
            let thresholds = thresholds.thresholds().context("Invalid threshold override")?;
            let (loader, thresholds) = (&loader, &thresholds);
            show(config, watch, move || async move {
                views::render(&views::admin_report(loader, thresholds).await)
            })
            .await;
        }
        AdminCommand::Deploy { strategy } => {
            let strategy = match strategy {
                Some(strategy) => strategy,
                None => best_published_strategy(&loader).await?,
            };
            launcher
                .trigger(Routine::DeployLive)
                .with_context(|| format!("Could not deploy {}", strategy))?;
            println!("Deploying strategy {} to live trading.", strategy);
        }
        AdminCommand::Retest => {
            launcher
                .trigger(Routine::BatchRetest)
                .context("Could not re-run batch testing")?;
            println!("Batch testing re-run started.");
        }
    }
    Ok(())
}

async fn user(config: &PipelineConfig, command: UserCommand) -> Result<()> {
    let bucket = config.open_bucket();
    let loader = MetricTableLoader::new(bucket.clone());
    let preferences = PreferencesStore::new(bucket);

    match command {
        UserCommand::Show { mode, watch } => {
            let (loader, preferences) = (&loader, &preferences);
            show(config, watch, move || async move {
                views::render(&views::user_report(loader, preferences, mode).await)
            })
            .await;
        }
        UserCommand::SavePreferences { style, thresholds } => {
            let thresholds = thresholds.thresholds().context("Invalid risk settings")?;
            save_preferences(&preferences, style, thresholds).await?;
        }
    }
    Ok(())
}

async fn save_preferences(
    preferences: &PreferencesStore,
    style: Strategy,
    thresholds: ThresholdSet,
) -> Result<()> {
    preferences
        .save(&UserPreferences::new(style, thresholds))
        .await
        .context("Failed to save preferences")?;
    println!("Preferences saved ({} strategy).", style);
    Ok(())
}

/// The best strategy by mean score in the published results. The gate is
/// reported but does not block a manual deployment.
async fn best_published_strategy(loader: &MetricTableLoader) -> Result<Strategy> {
    let table = loader
        .load_simulation()
        .await
        .context("No strategy simulation results to pick from")?;
    let Some(selection) = strategy_lab::evaluate(&table, &ThresholdSet::default()) else {
        bail!("Strategy simulation results are empty");
    };
    if selection.verdict().is_none() {
        warn!(
            "{} does not meet the default deployment thresholds",
            selection.strategy
        );
    }
    Ok(selection.strategy)
}

/// Renders once, or on every refresh tick in watch mode until the cycle
/// limit or Ctrl-C.
async fn show<F, Fut>(config: &PipelineConfig, watch: WatchArgs, render: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = String>,
{
    if !watch.enabled() {
        println!("{}", render().await);
        return;
    }

    let period = config.settings().refresh_interval();
    println!("Auto-refreshing every {} seconds...", period.as_secs());
    let render = &render;
    let cycles = refresh::run_every(period, watch.cycles, move |_| async move {
        println!("{}", render().await);
    });
    tokio::select! {
        _ = cycles => {}
        _ = tokio::signal::ctrl_c() => info!("Refresh stopped"),
    }
}
