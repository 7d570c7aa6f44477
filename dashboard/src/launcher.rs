use log::{error, info};
use pipeline_core::config::Settings;
use std::fmt;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// External routines the admin dashboard can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    DeployLive,
    BatchRetest,
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Routine::DeployLive => write!(f, "live deployment"),
            Routine::BatchRetest => write!(f, "batch retest"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("No command configured for the {0} routine")]
    EmptyCommand(Routine),

    #[error("Failed to start the {routine} routine ({program}): {source}")]
    Spawn {
        routine: Routine,
        program: String,
        source: std::io::Error,
    },
}

/// Starts the configured routines without waiting for them.
#[derive(Debug, Clone)]
pub struct RoutineLauncher {
    deploy_command: Vec<String>,
    retest_command: Vec<String>,
}

impl RoutineLauncher {
    pub fn new(deploy_command: Vec<String>, retest_command: Vec<String>) -> Self {
        Self {
            deploy_command,
            retest_command,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.deploy_command.clone(),
            settings.retest_command.clone(),
        )
    }

    fn command_for(&self, routine: Routine) -> &[String] {
        match routine {
            Routine::DeployLive => &self.deploy_command,
            Routine::BatchRetest => &self.retest_command,
        }
    }

    /// Spawns the routine and returns its process id. The exit status is
    /// never collected.
    pub fn trigger(&self, routine: Routine) -> Result<Option<u32>, LaunchError> {
        let (program, args) = self
            .command_for(routine)
            .split_first()
            .ok_or(LaunchError::EmptyCommand(routine))?;

        info!("Starting {} routine: {} {:?}", routine, program, args);
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn();

        match child {
            Ok(child) => {
                let pid = child.id();
                info!("{} routine started (pid {:?})", routine, pid);
                Ok(pid)
            }
            Err(e) => {
                error!("Failed to start {} routine: {}", routine, e);
                Err(LaunchError::Spawn {
                    routine,
                    program: program.clone(),
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_commands() {
        let launcher = RoutineLauncher::from_settings(&Settings::default());
        assert_eq!(
            launcher.command_for(Routine::DeployLive),
            ["python", "deploy_live_models.py"]
        );
        assert_eq!(
            launcher.command_for(Routine::BatchRetest),
            ["python", "step_5_batch_transform.py"]
        );
    }

    #[tokio::test]
    async fn empty_command_is_rejected() {
        let launcher = RoutineLauncher::new(Vec::new(), Vec::new());
        let err = launcher.trigger(Routine::BatchRetest).unwrap_err();
        assert!(matches!(err, LaunchError::EmptyCommand(Routine::BatchRetest)));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let launcher = RoutineLauncher::new(
            vec!["./no-such-deploy-routine".into()],
            vec!["true".into()],
        );
        let err = launcher.trigger(Routine::DeployLive).unwrap_err();
        assert!(matches!(
            err,
            LaunchError::Spawn {
                routine: Routine::DeployLive,
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn trigger_does_not_wait_for_exit() {
        let launcher = RoutineLauncher::new(vec!["true".into()], vec!["sleep".into(), "5".into()]);
        let started = std::time::Instant::now();
        assert!(launcher.trigger(Routine::BatchRetest).unwrap().is_some());
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }
}
