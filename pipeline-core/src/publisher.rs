use log::{error, info};

use crate::error::PublishError;
use crate::model::SimulationTable;
use crate::storage::{ArtifactKey, Bucket};

/// Writes simulation results back to the store under the fixed
/// strategy-performance key.
#[derive(Clone)]
pub struct ResultPublisher {
    bucket: Bucket,
}

impl ResultPublisher {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket }
    }

    /// Serializes `table` to CSV and replaces the published artifact.
    ///
    /// On failure the previously published object is left untouched; an
    /// empty table is refused before anything is written.
    pub async fn publish(&self, table: &SimulationTable) -> Result<(), PublishError> {
        if table.is_empty() {
            error!("No strategy results to upload.");
            return Err(PublishError::EmptyTable);
        }

        let key = ArtifactKey::StrategyPerformance;
        let bytes = table.to_csv_bytes()?;
        match self.bucket.put(key, &bytes).await {
            Ok(()) => {
                info!(
                    "Strategy simulation results uploaded: s3://{}/{} ({} rows)",
                    self.bucket.name(),
                    key,
                    table.len()
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to upload strategy results: {}", e);
                Err(PublishError::Store(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SimulationTrial, Strategy};
    use crate::storage::MemoryBlobStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn sample_table(profit: f64) -> SimulationTable {
        SimulationTable::new(vec![SimulationTrial {
            strategy: Strategy::Trend,
            profit,
            drawdown: 10.0,
            win_rate: 60.0,
            strategy_score: 50.0,
        }])
    }

    #[tokio::test]
    async fn empty_table_is_refused() {
        let store = Arc::new(MemoryBlobStore::new());
        let publisher =
            ResultPublisher::new(Bucket::new(store.clone(), "b", Duration::from_secs(1)));

        let err = publisher.publish(&SimulationTable::default()).await.unwrap_err();
        assert!(matches!(err, PublishError::EmptyTable));
        assert!(
            !store
                .contains("b", "strategy_simulation/strategy_performance.csv")
                .await
        );
    }

    #[tokio::test]
    async fn failed_upload_keeps_previous_artifact() {
        let store = Arc::new(MemoryBlobStore::new());
        let bucket = Bucket::new(store.clone(), "b", Duration::from_secs(1));
        let publisher = ResultPublisher::new(bucket.clone());

        publisher.publish(&sample_table(1.0)).await.unwrap();
        let before = bucket.get(ArtifactKey::StrategyPerformance).await.unwrap();

        store.set_fail_puts(true);
        let err = publisher.publish(&sample_table(2.0)).await.unwrap_err();
        assert!(matches!(err, PublishError::Store(_)));

        let after = bucket.get(ArtifactKey::StrategyPerformance).await.unwrap();
        assert_eq!(before, after);
    }
}
