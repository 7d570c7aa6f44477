use super::{GateDecision, Policy, StrategyMetrics};
use pipeline_core::ThresholdSet;

/// Mean profit per unit of mean drawdown.
pub struct RiskRewardPolicy;

impl Policy for RiskRewardPolicy {
    fn name(&self) -> &str {
        "RiskReward"
    }

    fn check(&self, metrics: &StrategyMetrics, thresholds: &ThresholdSet) -> GateDecision {
        if metrics.avg_risk_reward >= thresholds.risk_reward {
            GateDecision::Approved
        } else {
            GateDecision::Rejected(format!(
                "risk/reward {:.2} is below {:.2}",
                metrics.avg_risk_reward, thresholds.risk_reward
            ))
        }
    }
}
