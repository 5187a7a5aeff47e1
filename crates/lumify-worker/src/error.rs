//! Error types for the worker
//!
//! Network failures surface to the caller of a handler and are never retried
//! here. Store errors are caller bugs and pass through unchanged.

use lumify_store::StoreError;

/// Main worker error type
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// HTTP request could not be completed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status} for {path}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Request path
        path: String,
    },

    /// Response body did not have the expected shape
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Store rejected the request
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Worker configuration is invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// No user is signed in
    #[error("no current user")]
    NotAuthenticated,

    /// The receiving side of a message channel is gone
    #[error("{0} channel closed")]
    ChannelClosed(&'static str),

    /// Local file access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    /// Check if the failure happened on the network path
    #[inline]
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// Check if the failure is a server-side error status
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 500)
    }
}

impl From<toml::de::Error> for WorkerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}
