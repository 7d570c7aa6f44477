//! Process configuration.
//!
//! `Settings` are layered with the `config` crate (optional TOML file, then
//! `MLOPS__*` environment variables). The storage bucket and the model
//! artifacts location are named secrets resolved once at startup through a
//! [`SecretResolver`]; failing to resolve either is fatal.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::storage::{BlobStore, Bucket, FsBlobStore};

/// Secret holding the storage bucket identifier.
pub const BUCKET_SECRET: &str = "mlopa-bucket";
/// Secret holding the model artifacts location.
pub const MODEL_ARTIFACTS_SECRET: &str = "model-artifacts";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load settings: {0}")]
    Settings(#[from] ::config::ConfigError),

    #[error("Secret '{0}' could not be resolved")]
    MissingSecret(String),

    #[error("Secret '{0}' resolved to an empty value")]
    EmptySecret(String),
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("./data/store")
}

fn default_storage_timeout_secs() -> u64 {
    10
}

fn default_trials_per_strategy() -> usize {
    1000
}

fn default_seed() -> u64 {
    42
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_deploy_command() -> Vec<String> {
    vec!["python".into(), "deploy_live_models.py".into()]
}

fn default_retest_command() -> Vec<String> {
    vec!["python".into(), "step_5_batch_transform.py".into()]
}

/// Non-secret settings. Every field has a default so an absent file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory backing the filesystem blob store.
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,
    /// Upper bound for each blob store call.
    #[serde(default = "default_storage_timeout_secs")]
    pub storage_timeout_secs: u64,
    #[serde(default = "default_trials_per_strategy")]
    pub trials_per_strategy: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Program + args of the live deployment routine.
    #[serde(default = "default_deploy_command")]
    pub deploy_command: Vec<String>,
    /// Program + args of the batch retest routine.
    #[serde(default = "default_retest_command")]
    pub retest_command: Vec<String>,
    /// Fallback secret values, consulted after the environment.
    #[serde(default)]
    pub secrets: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            storage_timeout_secs: default_storage_timeout_secs(),
            trials_per_strategy: default_trials_per_strategy(),
            seed: default_seed(),
            refresh_interval_secs: default_refresh_interval_secs(),
            deploy_command: default_deploy_command(),
            retest_command: default_retest_command(),
            secrets: HashMap::new(),
        }
    }
}

impl Settings {
    /// Loads settings from an optional TOML file overlaid with `MLOPS__*`
    /// environment variables (e.g. `MLOPS__SEED=7`).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(::config::Environment::with_prefix("MLOPS").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_secs(self.storage_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Source of named secrets.
pub trait SecretResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Reads secrets from the environment: `mlopa-bucket` → `MLOPA_BUCKET`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretResolver;

impl EnvSecretResolver {
    pub fn variable_name(secret: &str) -> String {
        secret.to_ascii_uppercase().replace(['-', '.'], "_")
    }
}

impl SecretResolver for EnvSecretResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        std::env::var(Self::variable_name(name)).ok()
    }
}

/// Secrets from a fixed map (the settings file's `[secrets]` table, tests).
#[derive(Debug, Default, Clone)]
pub struct MapSecretResolver {
    values: HashMap<String, String>,
}

impl MapSecretResolver {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl SecretResolver for MapSecretResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Tries each resolver in order; the first hit wins.
#[derive(Default)]
pub struct LayeredSecretResolver {
    layers: Vec<Box<dyn SecretResolver>>,
}

impl LayeredSecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, layer: Box<dyn SecretResolver>) -> Self {
        self.layers.push(layer);
        self
    }
}

impl SecretResolver for LayeredSecretResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.resolve(name))
    }
}

/// Configuration resolved once at process start and passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    bucket: String,
    model_artifacts: String,
    settings: Settings,
}

impl PipelineConfig {
    /// Resolves both secrets. Either one missing or blank is an error.
    pub fn resolve(settings: Settings, secrets: &dyn SecretResolver) -> Result<Self, ConfigError> {
        let bucket = require_secret(secrets, BUCKET_SECRET)?;
        let model_artifacts = require_secret(secrets, MODEL_ARTIFACTS_SECRET)?;
        Ok(Self {
            bucket,
            model_artifacts,
            settings,
        })
    }

    /// Loads settings from `path` and resolves secrets from the environment,
    /// falling back to the settings file's `[secrets]` table.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let settings = Settings::load(path)?;
        let resolver = LayeredSecretResolver::new()
            .with(Box::new(EnvSecretResolver))
            .with(Box::new(MapSecretResolver::new(settings.secrets.clone())));
        Self::resolve(settings, &resolver)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn model_artifacts(&self) -> &str {
        &self.model_artifacts
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Binds the configured filesystem store to the configured bucket.
    pub fn open_bucket(&self) -> Bucket {
        let store: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(&self.settings.storage_root));
        self.bucket_on(store)
    }

    /// Binds an arbitrary store to the configured bucket.
    pub fn bucket_on(&self, store: Arc<dyn BlobStore>) -> Bucket {
        Bucket::new(store, self.bucket.clone(), self.settings.storage_timeout())
    }
}

fn require_secret(secrets: &dyn SecretResolver, name: &str) -> Result<String, ConfigError> {
    let value = secrets
        .resolve(name)
        .ok_or_else(|| ConfigError::MissingSecret(name.to_string()))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::EmptySecret(name.to_string()));
    }
    Ok(value.to_string())
}
