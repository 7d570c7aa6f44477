use log::{error, info};
use thiserror::Error;

use crate::error::LoadError;
use crate::model::UserPreferences;
use crate::storage::{ArtifactKey, Bucket, StoreError};

#[derive(Error, Debug)]
pub enum SavePreferencesError {
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to save preferences: {0}")]
    Store(#[from] StoreError),
}

/// JSON persistence for [`UserPreferences`]. Each save replaces the whole
/// document; nothing is merged.
#[derive(Clone)]
pub struct PreferencesStore {
    bucket: Bucket,
}

impl PreferencesStore {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket }
    }

    pub async fn save(&self, preferences: &UserPreferences) -> Result<(), SavePreferencesError> {
        let body = serde_json::to_vec(preferences)?;
        self.bucket
            .put(ArtifactKey::UserPreferences, &body)
            .await
            .map_err(|e| {
                error!("Failed to save preferences: {}", e);
                SavePreferencesError::Store(e)
            })?;
        info!(
            "Preferences saved (trading style {})",
            preferences.trading_style
        );
        Ok(())
    }

    pub async fn load(&self) -> Result<UserPreferences, LoadError> {
        let key = ArtifactKey::UserPreferences;
        let bytes = self.bucket.get(key).await?;
        serde_json::from_slice(&bytes).map_err(|err| LoadError::parse(key.as_str(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Strategy, ThresholdSet};
    use crate::storage::MemoryBlobStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn store() -> PreferencesStore {
        let backend = Arc::new(MemoryBlobStore::new());
        PreferencesStore::new(Bucket::new(backend, "b", Duration::from_secs(1)))
    }

    #[tokio::test]
    async fn save_overwrites_previous_preferences() {
        let prefs = store();

        let first = UserPreferences::new(
            Strategy::Trend,
            ThresholdSet {
                win_rate: 65.0,
                ..ThresholdSet::default()
            },
        );
        prefs.save(&first).await.unwrap();

        let second = UserPreferences::new(Strategy::Hedging, ThresholdSet::default());
        prefs.save(&second).await.unwrap();

        assert_eq!(prefs.load().await.unwrap(), second);
    }

    #[tokio::test]
    async fn missing_preferences_is_not_found() {
        let err = store().load().await.unwrap_err();
        assert!(err.is_not_found());
    }
}
