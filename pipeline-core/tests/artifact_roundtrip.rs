use pipeline_core::{
    ArtifactKind, Bucket, FsBlobStore, MetricTableLoader, PreferencesStore, ResultPublisher,
    SimulationTable, SimulationTrial, Strategy, ThresholdSet, UserPreferences,
};
use std::sync::Arc;
use std::time::Duration;

fn bucket(root: &std::path::Path) -> Bucket {
    Bucket::new(
        Arc::new(FsBlobStore::new(root)),
        "mlops-portfolio",
        Duration::from_secs(5),
    )
}

fn sample() -> SimulationTable {
    Strategy::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, strategy)| {
            (0..3).map(move |n| SimulationTrial {
                strategy: *strategy,
                profit: 101.25 + i as f64 * 0.5 + n as f64 / 3.0,
                drawdown: 7.123456789,
                win_rate: 61.987654321,
                strategy_score: 70.0 + n as f64 / 7.0,
            })
        })
        .collect()
}

#[tokio::test]
async fn published_results_reload_with_same_values() {
    let dir = tempfile::tempdir().unwrap();
    let bucket = bucket(dir.path());
    let table = sample();

    ResultPublisher::new(bucket.clone())
        .publish(&table)
        .await
        .unwrap();

    let reloaded = MetricTableLoader::new(bucket).load_simulation().await.unwrap();
    assert_eq!(reloaded.len(), table.len());
    for (expected, actual) in table.iter().zip(reloaded.iter()) {
        assert_eq!(expected.strategy, actual.strategy);
        assert!((expected.profit - actual.profit).abs() < 1e-6);
        assert!((expected.drawdown - actual.drawdown).abs() < 1e-6);
        assert!((expected.win_rate - actual.win_rate).abs() < 1e-6);
        assert!((expected.strategy_score - actual.strategy_score).abs() < 1e-6);
    }
}

#[tokio::test]
async fn published_results_are_readable_as_a_plain_table() {
    let dir = tempfile::tempdir().unwrap();
    let bucket = bucket(dir.path());
    ResultPublisher::new(bucket.clone())
        .publish(&sample())
        .await
        .unwrap();

    let table = MetricTableLoader::new(bucket)
        .load(ArtifactKind::StrategyPerformance)
        .await
        .unwrap();
    assert_eq!(
        table.columns(),
        ["strategy", "profit", "drawdown", "win_rate", "strategy_score"]
    );
    assert_eq!(table.len(), 12);
}

#[tokio::test]
async fn preferences_survive_a_new_store_handle() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = UserPreferences::new(
        Strategy::Swing,
        ThresholdSet {
            win_rate: 62.0,
            positive_days: 5,
            ..ThresholdSet::default()
        },
    );

    PreferencesStore::new(bucket(dir.path()))
        .save(&prefs)
        .await
        .unwrap();
    let loaded = PreferencesStore::new(bucket(dir.path())).load().await.unwrap();
    assert_eq!(loaded, prefs);
}
