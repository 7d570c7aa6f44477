use clap::{Args, Parser, Subcommand, ValueEnum};
use pipeline_core::args::{CommonArgs, ThresholdArgs};
use pipeline_core::Strategy;

/// Monitoring and deployment dashboards for the strategy pipeline.
#[derive(Parser, Debug)]
#[command(name = "dashboard")]
#[command(about = "Admin and user dashboards for the strategy pipeline", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// System monitoring and deployment.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Strategy choice, reports and preferences.
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Simulation results, best strategy, market performance and live inference.
    Show {
        #[command(flatten)]
        thresholds: ThresholdArgs,

        #[command(flatten)]
        watch: WatchArgs,
    },
    /// Starts the live deployment routine.
    Deploy {
        /// Strategy to deploy (default: best strategy from the published results).
        #[arg(long)]
        strategy: Option<Strategy>,
    },
    /// Re-runs batch testing.
    Retest,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Strategy choices, market performance and inference results.
    Show {
        /// Data mode for the inference section.
        #[arg(long, value_enum, default_value_t = DataMode::Batch)]
        mode: DataMode,

        #[command(flatten)]
        watch: WatchArgs,
    },
    /// Saves the trading style and risk settings.
    SavePreferences {
        /// Trading style: Trend, Contrarian, Hedging or Swing.
        #[arg(long)]
        style: Strategy,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Batch,
    Live,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WatchArgs {
    /// Re-render on the configured refresh interval.
    #[arg(long)]
    pub watch: bool,

    /// Stop after this many renders (implies --watch).
    #[arg(long)]
    pub cycles: Option<usize>,
}

impl WatchArgs {
    pub fn enabled(&self) -> bool {
        self.watch || self.cycles.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_admin_deploy_with_strategy() {
        let cli = Cli::parse_from(["dashboard", "admin", "deploy", "--strategy", "Swing"]);
        match cli.command {
            Commands::Admin {
                command: AdminCommand::Deploy { strategy },
            } => assert_eq!(strategy, Some(Strategy::Swing)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn unknown_strategy_is_a_usage_error() {
        let result = Cli::try_parse_from(["dashboard", "admin", "deploy", "--strategy", "Scalp"]);
        assert!(result.is_err());
    }

    #[test]
    fn user_show_defaults_to_batch() {
        let cli = Cli::parse_from(["dashboard", "user", "show", "--cycles", "2"]);
        match cli.command {
            Commands::User {
                command: UserCommand::Show { mode, watch },
            } => {
                assert_eq!(mode, DataMode::Batch);
                assert!(watch.enabled());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn save_preferences_takes_threshold_flags() {
        let cli = Cli::parse_from([
            "dashboard",
            "--storage-root",
            "/tmp/store",
            "user",
            "save-preferences",
            "--style",
            "Hedging",
            "--max-drawdown",
            "12",
        ]);
        match cli.command {
            Commands::User {
                command: UserCommand::SavePreferences { style, thresholds },
            } => {
                assert_eq!(style, Strategy::Hedging);
                assert_eq!(thresholds.thresholds().unwrap().max_drawdown, 12.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
