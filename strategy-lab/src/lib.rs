//! # Strategy Lab
//!
//! Monte Carlo simulation of the fixed trading strategies over model
//! predictions, the deployment gate that picks (or refuses) a strategy, and
//! the pipeline step that ties them to the artifact store.
//!
//! ## Modules
//! - `simulator`: Bootstrap trials per strategy from `predicted_price`.
//! - `selector`: Per-strategy aggregates and the threshold policies.
//! - `pipeline`: Load, simulate, select and publish in one run.

pub mod pipeline;
pub mod selector;
pub mod simulator;

pub use pipeline::{run, SimulationReport};
pub use selector::{evaluate, select, DeploymentGate, GateDecision, Selection, StrategyMetrics};
pub use simulator::{simulate, SimulationError, SimulationParams};
