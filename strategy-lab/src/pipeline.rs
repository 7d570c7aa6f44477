use log::{error, info, warn};
use pipeline_core::{
    ArtifactKind, MetricTableLoader, PublishError, ResultPublisher, SimulationTable, Strategy,
    ThresholdSet,
};

use crate::selector::{evaluate, Selection};
use crate::simulator::{simulate, SimulationError, SimulationParams};

/// Outcome of one simulation run.
#[derive(Debug)]
pub struct SimulationReport {
    pub table: SimulationTable,
    /// `None` only when the table has no trials.
    pub selection: Option<Selection>,
    /// Set when the results could not be uploaded. The verdict still stands.
    pub publish_error: Option<PublishError>,
}

impl SimulationReport {
    /// The strategy cleared for live deployment, if any.
    pub fn verdict(&self) -> Option<Strategy> {
        self.selection.as_ref().and_then(Selection::verdict)
    }

    pub fn published(&self) -> bool {
        self.publish_error.is_none()
    }
}

/// Loads inference results, simulates, selects and publishes.
///
/// A failed load is treated as an empty table, which stops the run with
/// [`SimulationError::EmptyInput`] before anything is selected or written.
pub async fn run(
    loader: &MetricTableLoader,
    publisher: &ResultPublisher,
    params: &SimulationParams,
    thresholds: &ThresholdSet,
    live: bool,
) -> Result<SimulationReport, SimulationError> {
    let inference = loader
        .load_or_empty(ArtifactKind::InferenceResults { live })
        .await;

    let table = simulate(&inference, params).map_err(|e| {
        error!("Simulation aborted: {}", e);
        e
    })?;

    let selection = evaluate(&table, thresholds);
    match selection.as_ref().and_then(Selection::verdict) {
        Some(strategy) => info!("Strategy cleared for deployment: {}", strategy),
        None => warn!("No strategy met the deployment thresholds"),
    }

    let publish_error = publisher.publish(&table).await.err();

    Ok(SimulationReport {
        table,
        selection,
        publish_error,
    })
}
