//! # Pipeline Core Library
//!
//! Shared foundation for the strategy simulation step and the dashboards.
//!
//! ## Modules
//! - `model`: Metric tables, simulation trials, thresholds and preferences.
//! - `storage`: The blob store gateway (trait + filesystem and in-memory backends).
//! - `loader`: Fetches tabular artifacts and parses them into `MetricTable`s.
//! - `publisher`: Writes simulation results back to the store.
//! - `preferences`: Persists user preferences as JSON.
//! - `config`: Settings file/environment layering and secret resolution.
//! - `args`: Standardized argument parsing.
//! - `fs`: Atomic file writes used by the filesystem store.

pub mod args;
pub mod config;
pub mod error;
pub mod fs;
pub mod loader;
pub mod model;
pub mod preferences;
pub mod publisher;
pub mod storage;

pub use error::{LoadError, PublishError};
pub use loader::{ArtifactKind, MetricTableLoader};
pub use model::{
    CellValue, MetricTable, SimulationTable, SimulationTrial, Strategy, ThresholdSet,
    UserPreferences,
};
pub use preferences::PreferencesStore;
pub use publisher::ResultPublisher;
pub use storage::{ArtifactKey, BlobStore, Bucket, FsBlobStore, MemoryBlobStore, StoreError};
