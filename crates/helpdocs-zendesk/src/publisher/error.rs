//! Error types for publishing.

use std::path::PathBuf;

use crate::error::ZendeskError;

/// Error during publishing.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Help Center API error.
    #[error(transparent)]
    Zendesk(#[from] ZendeskError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed metadata sidecar.
    #[error("invalid metadata in {}: {source}", path.display())]
    Yaml {
        /// Offending file.
        path: PathBuf,
        /// Parse error.
        source: serde_yaml::Error,
    },

    /// Response body did not match the expected record.
    #[error("unexpected response shape: {0}")]
    Json(#[from] serde_json::Error),

    /// Source directory missing or unusable.
    #[error("invalid document tree: {0}")]
    InvalidTree(String),
}
