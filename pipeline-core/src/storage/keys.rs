/// Object keys of the artifacts exchanged between pipeline steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKey {
    StrategyPerformance,
    TradePerformance,
    LiveInferenceResults,
    StagingInferenceResults,
    UserPreferences,
}

impl ArtifactKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKey::StrategyPerformance => "strategy_simulation/strategy_performance.csv",
            ArtifactKey::TradePerformance => "trade_performance/trade_performance.csv",
            ArtifactKey::LiveInferenceResults => "inference_results/live_inference_results.csv",
            ArtifactKey::StagingInferenceResults => {
                "inference_results/staging_inference_results.csv"
            }
            ArtifactKey::UserPreferences => "user_preferences/user_preferences.json",
        }
    }

    pub fn inference_results(is_live: bool) -> Self {
        if is_live {
            ArtifactKey::LiveInferenceResults
        } else {
            ArtifactKey::StagingInferenceResults
        }
    }
}

impl std::fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
