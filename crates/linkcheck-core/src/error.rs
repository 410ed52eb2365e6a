use std::path::PathBuf;

use thiserror::Error;

use crate::domain::TaskId;

/// Status store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task not found: {0}")]
    NotFound(TaskId),

    #[error("store file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode store state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors surfaced by the boundary operations of `LinkChecker`.
#[derive(Debug, Error)]
pub enum LinkCheckError {
    #[error("link batch is empty")]
    EmptyBatch,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
