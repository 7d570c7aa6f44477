use super::{GateDecision, Policy, StrategyMetrics};
use pipeline_core::ThresholdSet;

/// Requires gross profit to outweigh losses by the threshold factor. A
/// strategy with no losing trial always passes.
pub struct ProfitFactorPolicy;

impl Policy for ProfitFactorPolicy {
    fn name(&self) -> &str {
        "ProfitFactor"
    }

    fn check(&self, metrics: &StrategyMetrics, thresholds: &ThresholdSet) -> GateDecision {
        if metrics.avg_profit_factor >= thresholds.profit_factor {
            GateDecision::Approved
        } else {
            GateDecision::Rejected(format!(
                "profit factor {:.2} is below {:.2}",
                metrics.avg_profit_factor, thresholds.profit_factor
            ))
        }
    }
}
