use log::{debug, info};
use pipeline_core::config::Settings;
use pipeline_core::{MetricTable, SimulationTable, SimulationTrial, Strategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use thiserror::Error;

/// Column of the inference results holding model predictions.
pub const PREDICTED_PRICE_COLUMN: &str = "predicted_price";

/// Synthetic drawdown draw (%). Not derived from the samples.
const DRAWDOWN_RANGE: Range<f64> = 5.0..15.0;
/// Synthetic win rate draw (%). Not derived from the samples.
const WIN_RATE_RANGE: Range<f64> = 50.0..70.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    #[error("No predicted prices to sample from")]
    EmptyInput,

    #[error("Inference results have no '{0}' column")]
    MissingColumn(&'static str),

    #[error(
        "{strategies} strategies x {trials_per_strategy} trials exceeds the limit of {max} trials",
        max = MAX_TOTAL_TRIALS
    )]
    TooManyTrials {
        strategies: usize,
        trials_per_strategy: usize,
    },
}

/// Upper bound on the trials of one run, across all strategies.
pub const MAX_TOTAL_TRIALS: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub strategies: Vec<Strategy>,
    pub trials_per_strategy: usize,
    /// Draws per trial, with replacement.
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            strategies: Strategy::ALL.to_vec(),
            trials_per_strategy: 1000,
            sample_size: 30,
            seed: 42,
        }
    }
}

impl SimulationParams {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            trials_per_strategy: settings.trials_per_strategy,
            seed: settings.seed,
            ..Self::default()
        }
    }
}

/// Weighted composite used to rank strategies.
pub fn strategy_score(profit: f64, drawdown: f64, win_rate: f64) -> f64 {
    0.4 * win_rate + 0.3 * profit + 0.2 * (profit / drawdown) - 0.1 * drawdown
}

/// Runs `trials_per_strategy` bootstrap trials for every strategy, in order.
///
/// A single generator seeded from `params.seed` drives the whole run, so the
/// same table and params always yield the same trials. Non-numeric cells in
/// the `predicted_price` column are skipped.
pub fn simulate(
    inference: &MetricTable,
    params: &SimulationParams,
) -> Result<SimulationTable, SimulationError> {
    if inference.is_empty() {
        return Err(SimulationError::EmptyInput);
    }
    let prices = inference
        .numeric_column(PREDICTED_PRICE_COLUMN)
        .ok_or(SimulationError::MissingColumn(PREDICTED_PRICE_COLUMN))?;
    if prices.is_empty() || params.sample_size == 0 {
        return Err(SimulationError::EmptyInput);
    }

    let capacity = params
        .strategies
        .len()
        .checked_mul(params.trials_per_strategy)
        .filter(|count| *count <= MAX_TOTAL_TRIALS)
        .ok_or(SimulationError::TooManyTrials {
            strategies: params.strategies.len(),
            trials_per_strategy: params.trials_per_strategy,
        })?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut trials = Vec::with_capacity(capacity);

    for &strategy in &params.strategies {
        for _ in 0..params.trials_per_strategy {
            let total: f64 = (0..params.sample_size)
                .map(|_| prices[rng.gen_range(0..prices.len())])
                .sum();
            let profit = total / params.sample_size as f64;
            let drawdown = rng.gen_range(DRAWDOWN_RANGE);
            let win_rate = rng.gen_range(WIN_RATE_RANGE);

            trials.push(SimulationTrial {
                strategy,
                profit,
                drawdown,
                win_rate,
                strategy_score: strategy_score(profit, drawdown, win_rate),
            });
        }
        debug!(
            "Simulated {} trials for {}",
            params.trials_per_strategy, strategy
        );
    }

    info!(
        "Monte Carlo simulation complete: {} trials over {} predictions (seed {})",
        trials.len(),
        prices.len(),
        params.seed
    );
    Ok(SimulationTable::new(trials))
}
