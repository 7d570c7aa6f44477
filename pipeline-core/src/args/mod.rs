//! Defines the command-line arguments shared by the pipeline binaries.
//!
//! Both the simulation step and the dashboards locate their settings file and
//! storage root the same way; flattening [`CommonArgs`] into each binary's
//! parser keeps that uniform.

use clap::Args;
use std::path::PathBuf;

use crate::config::{ConfigError, PipelineConfig};
use crate::model::{ThresholdError, ThresholdSet};

/// Standard configuration parameters parsed from the command line.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to the settings file (TOML; optional)
    #[arg(long, default_value = "./config/pipeline.toml")]
    config: PathBuf,

    /// Overrides the storage root from the settings file
    #[arg(long)]
    storage_root: Option<PathBuf>,
}

impl CommonArgs {
    /// Returns the path to the settings file.
    pub fn get_config_path(&self) -> PathBuf {
        self.config.clone()
    }

    /// Returns the storage root override, if any.
    pub fn get_storage_root(&self) -> Option<PathBuf> {
        self.storage_root.clone()
    }

    /// Loads settings, resolves secrets and applies command-line overrides.
    ///
    /// # Returns
    ///
    /// * `Ok(PipelineConfig)` ready to be passed to each component.
    /// * `Err` if the settings file is invalid or a secret is missing.
    pub fn load_config(&self) -> Result<PipelineConfig, ConfigError> {
        let mut config = PipelineConfig::load(&self.config)?;
        if let Some(root) = &self.storage_root {
            config.settings_mut().storage_root = root.clone();
        }
        Ok(config)
    }
}

/// Session overrides for the deployment thresholds. Unset flags keep the
/// defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ThresholdArgs {
    /// Minimum average win rate (%), 50-70
    #[arg(long)]
    win_rate: Option<f64>,

    /// Minimum profit factor, 1-2
    #[arg(long)]
    profit_factor: Option<f64>,

    /// Minimum risk/reward ratio, 1-3
    #[arg(long)]
    risk_reward: Option<f64>,

    /// Maximum drawdown (%), 5-20
    #[arg(long)]
    max_drawdown: Option<f64>,

    /// Positive days required, 1-7
    #[arg(long)]
    positive_days: Option<u32>,
}

impl ThresholdArgs {
    /// Applies the overrides on top of `base` and validates the result.
    pub fn apply(&self, base: ThresholdSet) -> Result<ThresholdSet, ThresholdError> {
        let thresholds = ThresholdSet {
            win_rate: self.win_rate.unwrap_or(base.win_rate),
            profit_factor: self.profit_factor.unwrap_or(base.profit_factor),
            risk_reward: self.risk_reward.unwrap_or(base.risk_reward),
            max_drawdown: self.max_drawdown.unwrap_or(base.max_drawdown),
            positive_days: self.positive_days.unwrap_or(base.positive_days),
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn thresholds(&self) -> Result<ThresholdSet, ThresholdError> {
        self.apply(ThresholdSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        thresholds: ThresholdArgs,
    }

    #[test]
    fn defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(
            cli.common.get_config_path(),
            PathBuf::from("./config/pipeline.toml")
        );
        assert_eq!(cli.common.get_storage_root(), None);
    }

    #[test]
    fn storage_root_override_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(
            &path,
            "[secrets]\n\"mlopa-bucket\" = \"b\"\n\"model-artifacts\" = \"m\"\n",
        )
        .unwrap();

        let cli = TestCli::parse_from([
            "test",
            "--config",
            path.to_str().unwrap(),
            "--storage-root",
            "/tmp/store",
        ]);
        let config = cli.common.load_config().unwrap();
        assert_eq!(config.settings().storage_root, PathBuf::from("/tmp/store"));
    }

    #[test]
    fn threshold_flags_override_defaults() {
        let cli = TestCli::parse_from(["test", "--win-rate", "60", "--positive-days", "5"]);
        let thresholds = cli.thresholds.thresholds().unwrap();
        assert_eq!(thresholds.win_rate, 60.0);
        assert_eq!(thresholds.positive_days, 5);
        assert_eq!(thresholds.profit_factor, 1.5);
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let cli = TestCli::parse_from(["test", "--risk-reward", "4.5"]);
        let err = cli.thresholds.thresholds().unwrap_err();
        assert_eq!(err.name, "risk_reward");
    }
}
