//! Picks the best simulated strategy and gates it against deployment
//! thresholds.
//!
//! Ranking uses the mean `strategy_score` per label; the gate then checks the
//! winner's aggregate metrics with a list of [`Policy`]s, first rejection
//! wins. Only the winner is gated: if it fails, no runner-up is considered.

use log::{info, warn};
use pipeline_core::{SimulationTable, SimulationTrial, Strategy, ThresholdSet};

pub mod profit_factor;
pub mod risk_reward;
pub mod win_rate;

pub use profit_factor::ProfitFactorPolicy;
pub use risk_reward::RiskRewardPolicy;
pub use win_rate::WinRatePolicy;

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Approved,
    Rejected(String),
}

impl GateDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, GateDecision::Approved)
    }
}

/// Aggregates over every trial of one strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyMetrics {
    pub avg_win_rate: f64,
    /// `Σprofit / |Σ negative profits|`, infinite when no trial lost money.
    pub avg_profit_factor: f64,
    /// `mean(profit) / |mean(drawdown)|`, infinite when the mean drawdown is 0.
    pub avg_risk_reward: f64,
}

impl StrategyMetrics {
    pub fn from_trials<'a, I>(trials: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a SimulationTrial>,
    {
        let mut count = 0usize;
        let mut win_rate = 0.0;
        let mut profit = 0.0;
        let mut losses = 0.0;
        let mut drawdown = 0.0;
        for trial in trials {
            count += 1;
            win_rate += trial.win_rate;
            profit += trial.profit;
            drawdown += trial.drawdown;
            if trial.profit < 0.0 {
                losses += trial.profit;
            }
        }
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let avg_profit_factor = if losses == 0.0 {
            f64::INFINITY
        } else {
            profit / f64::abs(losses)
        };
        let mean_drawdown = drawdown / n;
        let avg_risk_reward = if mean_drawdown == 0.0 {
            f64::INFINITY
        } else {
            (profit / n) / mean_drawdown.abs()
        };

        Some(Self {
            avg_win_rate: win_rate / n,
            avg_profit_factor,
            avg_risk_reward,
        })
    }
}

pub trait Policy: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, metrics: &StrategyMetrics, thresholds: &ThresholdSet) -> GateDecision;
}

/// Ordered set of deployment policies.
pub struct DeploymentGate {
    policies: Vec<Box<dyn Policy>>,
}

impl Default for DeploymentGate {
    fn default() -> Self {
        let mut gate = Self::new();
        gate.add_policy(Box::new(WinRatePolicy));
        gate.add_policy(Box::new(ProfitFactorPolicy));
        gate.add_policy(Box::new(RiskRewardPolicy));
        gate
    }
}

impl DeploymentGate {
    /// A gate with no policies; approves everything.
    pub fn new() -> Self {
        Self {
            policies: Vec::new(),
        }
    }

    pub fn add_policy(&mut self, policy: Box<dyn Policy>) {
        self.policies.push(policy);
    }

    pub fn check(&self, metrics: &StrategyMetrics, thresholds: &ThresholdSet) -> GateDecision {
        for policy in &self.policies {
            if let GateDecision::Rejected(reason) = policy.check(metrics, thresholds) {
                warn!("Strategy rejected by {}: {}", policy.name(), reason);
                return GateDecision::Rejected(format!("{}: {}", policy.name(), reason));
            }
        }
        GateDecision::Approved
    }
}

/// The best strategy with its score, metrics and gate decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub strategy: Strategy,
    pub mean_score: f64,
    pub metrics: StrategyMetrics,
    pub decision: GateDecision,
}

impl Selection {
    /// The strategy to deploy, if the gate approved it.
    pub fn verdict(&self) -> Option<Strategy> {
        self.decision.is_approved().then_some(self.strategy)
    }
}

/// Mean score per label, in first-seen order.
pub fn mean_scores(table: &SimulationTable) -> Vec<(Strategy, f64)> {
    let mut groups: Vec<(Strategy, f64, usize)> = Vec::new();
    for trial in table {
        match groups.iter_mut().find(|(s, _, _)| *s == trial.strategy) {
            Some((_, sum, count)) => {
                *sum += trial.strategy_score;
                *count += 1;
            }
            None => groups.push((trial.strategy, trial.strategy_score, 1)),
        }
    }
    groups
        .into_iter()
        .map(|(strategy, sum, count)| (strategy, sum / count as f64))
        .collect()
}

/// Ranks the strategies and gates the best one with `gate`.
///
/// Returns `None` only for an empty table. Equal mean scores keep the
/// strategy that appeared first.
pub fn evaluate_with(
    gate: &DeploymentGate,
    table: &SimulationTable,
    thresholds: &ThresholdSet,
) -> Option<Selection> {
    let mut best: Option<(Strategy, f64)> = None;
    for (strategy, score) in mean_scores(table) {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            Some(_) if score.is_nan() => {}
            _ => best = Some((strategy, score)),
        }
    }
    let (strategy, mean_score) = best?;

    let metrics =
        StrategyMetrics::from_trials(table.iter().filter(|trial| trial.strategy == strategy))?;
    let decision = gate.check(&metrics, thresholds);

    info!(
        "Best strategy {} (mean score {:.2}, win rate {:.2}%, profit factor {:.2}, risk/reward {:.2})",
        strategy,
        mean_score,
        metrics.avg_win_rate,
        metrics.avg_profit_factor,
        metrics.avg_risk_reward
    );

    Some(Selection {
        strategy,
        mean_score,
        metrics,
        decision,
    })
}

pub fn evaluate(table: &SimulationTable, thresholds: &ThresholdSet) -> Option<Selection> {
    evaluate_with(&DeploymentGate::default(), table, thresholds)
}

/// The best strategy if it clears every threshold, otherwise `None`.
pub fn select(table: &SimulationTable, thresholds: &ThresholdSet) -> Option<Strategy> {
    evaluate(table, thresholds).and_then(|selection| selection.verdict())
}
