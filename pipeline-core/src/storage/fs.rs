use async_trait::async_trait;
use log::debug;
use std::io;
use std::path::{Component, Path, PathBuf};

use super::{BlobStore, StoreError};
use crate::fs::persistence;

/// Local stand-in for the object store.
///
/// Objects live at `<root>/<bucket>/<key>`; writes are atomic per object.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        // Keys are relative object names; reject anything that would escape the bucket.
        let relative = Path::new(key);
        let valid = !bucket.is_empty()
            && !bucket.contains(['/', '\\'])
            && bucket != ".."
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !valid || key.is_empty() {
            return Err(StoreError::Unavailable(format!(
                "Invalid object name {}/{}",
                bucket, key
            )));
        }
        Ok(self.root.join(bucket).join(relative))
    }
}

fn map_io(err: io::Error, bucket: &str, key: &str) -> StoreError {
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        _ => StoreError::Unavailable(format!("{}/{}: {}", bucket, key, err)),
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(bucket, key)?;
        debug!("Reading {}", path.display());
        persistence::read_bytes(&path)
            .await
            .map_err(|err| map_io(err, bucket, key))
    }

    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        debug!("Writing {} bytes to {}", bytes.len(), path.display());
        persistence::write_atomic(&path, bytes)
            .await
            .map_err(|err| map_io(err, bucket, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        store
            .put("bucket", "strategy_simulation/strategy_performance.csv", b"a,b\n")
            .await
            .unwrap();

        let bytes = store
            .get("bucket", "strategy_simulation/strategy_performance.csv")
            .await
            .unwrap();
        assert_eq!(bytes, b"a,b\n");
        assert!(dir
            .path()
            .join("bucket/strategy_simulation/strategy_performance.csv")
            .exists());
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let err = store.get("bucket", "nope.csv").await.unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                bucket: "bucket".to_string(),
                key: "nope.csv".to_string()
            }
        );
    }

    #[tokio::test]
    async fn expired_put_still_writes_whole_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        let _ = tokio::time::timeout(
            Duration::ZERO,
            store.put("bucket", "results.csv", b"complete"),
        )
        .await;

        let path = dir.path().join("bucket/results.csv");
        for _ in 0..200 {
            if path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(std::fs::read(&path).unwrap(), b"complete");
        assert!(!dir.path().join("bucket/results.csv.tmp").exists());
    }

    #[tokio::test]
    async fn rejects_keys_escaping_the_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());

        assert!(matches!(
            store.put("bucket", "../outside.csv", b"x").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.get("../bucket", "a.csv").await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
