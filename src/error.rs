use std::path::PathBuf;

use thiserror::Error;

/// Failures at the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("stored todo list is not valid: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("failed to serialize todo list: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
