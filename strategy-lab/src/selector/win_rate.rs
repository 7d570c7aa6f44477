use super::{GateDecision, Policy, StrategyMetrics};
use pipeline_core::ThresholdSet;

/// Requires the average win rate to reach the threshold.
pub struct WinRatePolicy;

impl Policy for WinRatePolicy {
    fn name(&self) -> &str {
        "WinRate"
    }

    fn check(&self, metrics: &StrategyMetrics, thresholds: &ThresholdSet) -> GateDecision {
        if metrics.avg_win_rate >= thresholds.win_rate {
            GateDecision::Approved
        } else {
            GateDecision::Rejected(format!(
                "average win rate {:.2}% is below {:.2}%",
                metrics.avg_win_rate, thresholds.win_rate
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(avg_win_rate: f64) -> StrategyMetrics {
        StrategyMetrics {
            avg_win_rate,
            avg_profit_factor: 2.0,
            avg_risk_reward: 3.0,
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        let thresholds = ThresholdSet::default();
        assert!(WinRatePolicy.check(&metrics(55.0), &thresholds).is_approved());
        assert!(!WinRatePolicy.check(&metrics(54.99), &thresholds).is_approved());
    }
}
