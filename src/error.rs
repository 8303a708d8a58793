//! Error types for the listing watcher

use thiserror::Error;

/// Errors that can occur when fetching a listings snapshot from a feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body was not a recognized listings shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Feed API returned a non-success status
    #[error("Feed API error: {0}")]
    ApiError(String),
}

/// Errors that can occur when loading or persisting the alert history
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage I/O failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted history blob could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store backend reported a failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a Backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Errors surfaced by the watcher itself (construction and startup)
#[derive(Debug, Error)]
pub enum WatchError {
    /// Feed setup or fetch failed
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// History load or persistence failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
