use thiserror::Error;

use crate::storage::StoreError;

/// Failure to obtain a usable table (or JSON document) from the store.
///
/// Callers recover locally: the dashboards print a notice and the simulation
/// step falls back to an empty table.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The object could not be fetched (missing, unreachable, timed out).
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] StoreError),

    /// The object was fetched but its content is malformed.
    #[error("Parse failed for {key}: {reason}")]
    Parse { key: String, reason: String },
}

impl LoadError {
    pub fn parse(key: impl Into<String>, reason: impl ToString) -> Self {
        LoadError::Parse {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::Retrieval(StoreError::NotFound { .. }))
    }
}

/// Failure to write the simulation artifact. The previously published
/// object is left as it was.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("No strategy results to upload")]
    EmptyTable,

    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] csv::Error),

    #[error("Failed to upload results: {0}")]
    Store(#[from] StoreError),
}
