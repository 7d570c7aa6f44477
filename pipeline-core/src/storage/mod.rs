//! Blob store gateway.
//!
//! The object store is an external collaborator: the pipeline only needs
//! `get`/`put` of whole byte blobs under a bucket + key namespace. Backends
//! are hidden behind [`BlobStore`].

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub mod fs;
pub mod keys;
pub mod memory;

pub use fs::FsBlobStore;
pub use keys::ArtifactKey;
pub use memory::MemoryBlobStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Object s3://{bucket}/{key} not found")]
    NotFound { bucket: String, key: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store call for s3://{bucket}/{key} timed out after {timeout:?}")]
    Timeout {
        bucket: String,
        key: String,
        timeout: Duration,
    },
}

/// Abstraction over the object store holding pipeline artifacts.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetches the full content of `bucket/key`.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Replaces the content of `bucket/key`.
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Runs one store call with an upper bound on its duration. Expiry is
/// reported as [`StoreError::Timeout`].
pub async fn with_timeout<T, F>(
    timeout: Duration,
    bucket: &str,
    key: &str,
    call: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            bucket: bucket.to_string(),
            key: key.to_string(),
            timeout,
        }),
    }
}

/// A store bound to one bucket, with every call bounded by `timeout`.
///
/// Loader, publisher and preferences store all talk to the gateway through
/// this handle. A `put` that ends in [`StoreError::Timeout`] has an unknown
/// outcome: the backend may still finish the write, so the object holds
/// either the old or the new content, never a mix.
#[derive(Clone)]
pub struct Bucket {
    store: Arc<dyn BlobStore>,
    name: String,
    timeout: Duration,
}

impl Bucket {
    pub fn new(store: Arc<dyn BlobStore>, name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            name: name.into(),
            timeout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn get(&self, key: ArtifactKey) -> Result<Vec<u8>, StoreError> {
        let key = key.as_str();
        with_timeout(self.timeout, &self.name, key, self.store.get(&self.name, key)).await
    }

    pub async fn put(&self, key: ArtifactKey, bytes: &[u8]) -> Result<(), StoreError> {
        let key = key.as_str();
        with_timeout(
            self.timeout,
            &self.name,
            key,
            self.store.put(&self.name, key, bytes),
        )
        .await
    }
}
