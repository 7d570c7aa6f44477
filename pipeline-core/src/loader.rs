use log::{info, warn};

use crate::error::LoadError;
use crate::model::{MetricTable, SimulationTable};
use crate::storage::{ArtifactKey, Bucket};

/// The tabular artifacts the dashboards and the simulation step read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Published Monte Carlo results.
    StrategyPerformance,
    /// Trade performance report.
    MarketPerformance,
    /// Model predictions; `live` selects live vs staging (batch) results.
    InferenceResults { live: bool },
}

impl ArtifactKind {
    pub fn key(&self) -> ArtifactKey {
        match self {
            ArtifactKind::StrategyPerformance => ArtifactKey::StrategyPerformance,
            ArtifactKind::MarketPerformance => ArtifactKey::TradePerformance,
            ArtifactKind::InferenceResults { live } => ArtifactKey::inference_results(*live),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ArtifactKind::StrategyPerformance => "strategy simulation results",
            ArtifactKind::MarketPerformance => "market performance data",
            ArtifactKind::InferenceResults { live: true } => "live inference results",
            ArtifactKind::InferenceResults { live: false } => "staging inference results",
        }
    }
}

/// Fetches tabular artifacts and parses them into [`MetricTable`]s.
///
/// One attempt per call, no retries.
#[derive(Clone)]
pub struct MetricTableLoader {
    bucket: Bucket,
}

impl MetricTableLoader {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket }
    }

    pub async fn load(&self, kind: ArtifactKind) -> Result<MetricTable, LoadError> {
        let key = kind.key();
        let bytes = self.bucket.get(key).await?;
        let table = MetricTable::from_csv_bytes(&bytes)
            .map_err(|err| LoadError::parse(key.as_str(), err))?;
        info!(
            "Loaded {} ({} rows) from s3://{}/{}",
            kind.describe(),
            table.len(),
            self.bucket.name(),
            key
        );
        Ok(table)
    }

    /// Fail-closed form of [`load`](Self::load): any failure is logged and an
    /// empty table is returned.
    pub async fn load_or_empty(&self, kind: ArtifactKind) -> MetricTable {
        match self.load(kind).await {
            Ok(table) => table,
            Err(e) => {
                warn!("Failed to load {}: {}", kind.describe(), e);
                MetricTable::empty()
            }
        }
    }

    /// Loads the published simulation artifact as typed trials.
    pub async fn load_simulation(&self) -> Result<SimulationTable, LoadError> {
        let table = self.load(ArtifactKind::StrategyPerformance).await?;
        SimulationTable::from_metric_table(&table)
            .map_err(|err| LoadError::parse(ArtifactKey::StrategyPerformance.as_str(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BlobStore, MemoryBlobStore, StoreError};
    use std::sync::Arc;
    use std::time::Duration;

    fn loader_with(store: Arc<MemoryBlobStore>) -> MetricTableLoader {
        MetricTableLoader::new(Bucket::new(store, "bucket", Duration::from_secs(1)))
    }

    #[test]
    fn kinds_map_to_keys() {
        assert_eq!(
            ArtifactKind::InferenceResults { live: true }.key().as_str(),
            "inference_results/live_inference_results.csv"
        );
        assert_eq!(
            ArtifactKind::InferenceResults { live: false }.key().as_str(),
            "inference_results/staging_inference_results.csv"
        );
        assert_eq!(
            ArtifactKind::MarketPerformance.key().as_str(),
            "trade_performance/trade_performance.csv"
        );
    }

    #[tokio::test]
    async fn loads_the_selected_inference_key() {
        let store = Arc::new(MemoryBlobStore::new());
        store
            .put(
                "bucket",
                "inference_results/staging_inference_results.csv",
                b"predicted_price\n1.0\n2.0\n",
            )
            .await
            .unwrap();
        let loader = loader_with(store);

        let staging = loader
            .load(ArtifactKind::InferenceResults { live: false })
            .await
            .unwrap();
        assert_eq!(staging.len(), 2);

        let live = loader
            .load(ArtifactKind::InferenceResults { live: true })
            .await
            .unwrap_err();
        assert!(live.is_not_found());
    }

    #[tokio::test]
    async fn malformed_csv_is_a_parse_error() {
        let store = Arc::new(MemoryBlobStore::new());
        store
            .put("bucket", "trade_performance/trade_performance.csv", b"a,b\n1\n")
            .await
            .unwrap();
        let loader = loader_with(store);

        let err = loader
            .load(ArtifactKind::MarketPerformance)
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_or_empty_fails_closed() {
        let store = Arc::new(MemoryBlobStore::new());
        store.set_fail_gets(true);
        let loader = loader_with(store);

        let table = loader.load_or_empty(ArtifactKind::MarketPerformance).await;
        assert!(table.is_empty());

        let err = loader.load(ArtifactKind::MarketPerformance).await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Retrieval(StoreError::Unavailable(_))
        ));
    }
}
