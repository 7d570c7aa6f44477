//! Core data models shared by the simulation step and the dashboards.
//!
//! # Submodules
//! - [`strategy`]: The fixed set of simulated trading styles.
//! - [`table`]: Generic row-oriented tables parsed from CSV artifacts.
//! - [`simulation`]: Monte Carlo trials and the tables they form.
//! - [`thresholds`]: Deployment thresholds and user preferences.

pub mod simulation;
pub mod strategy;
pub mod table;
pub mod thresholds;

pub use simulation::{SimulationTable, SimulationTrial};
pub use strategy::{Strategy, UnknownStrategy};
pub use table::{CellValue, MetricRow, MetricTable};
pub use thresholds::{ThresholdError, ThresholdSet, UserPreferences};
