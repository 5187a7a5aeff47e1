//! Error types for the workspace store
//!
//! Cache misses are not errors; they come back as `None`. The only failure a
//! caller can provoke at read time is naming a kind the store does not hold.

/// Main store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Requested kind is neither `vertex` nor `edge`
    #[error("kind parameter not valid: {0:?}")]
    InvalidKind(String),

    /// Store configuration could not be read
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

impl StoreError {
    /// Check if error indicates a caller bug
    ///
    /// Store errors are never retried; this exists so worker code can decide
    /// whether to surface the failure or log it.
    #[inline]
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidKind(_))
    }
}
