//! Worker configuration

use crate::error::WorkerError;
use lumify_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Worker configuration
///
/// Every field has a default, so an empty TOML document is valid.
///
/// ```toml
/// base_url = "https://lumify.example.com"
/// log_filter = "lumify_store=debug,info"
///
/// [store]
/// entity_capacity = 5000
/// volatile_fields = ["score"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Server root, without trailing slash
    pub base_url: String,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Per-request timeout
    pub request_timeout_ms: u64,
    /// Store settings
    pub store: StoreConfig,
}

impl WorkerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With server root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With store settings
    #[inline]
    #[must_use]
    pub fn with_store(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }

    /// Per-request timeout
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Parse from a TOML document
    ///
    /// # Errors
    /// `WorkerError::Config` on malformed TOML or an empty `base_url`.
    pub fn from_toml_str(document: &str) -> Result<Self, WorkerError> {
        let config: Self = toml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// `WorkerError::Io` if the file cannot be read, otherwise as
    /// [`WorkerConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkerError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loaded worker configuration");
        Self::from_toml_str(&document)
    }

    fn validate(&self) -> Result<(), WorkerError> {
        if self.base_url.trim().is_empty() {
            return Err(WorkerError::Config("base_url must not be empty".to_string()));
        }
        if self.store.entity_capacity == 0 {
            return Err(WorkerError::Config(
                "store.entity_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            log_filter: "info".to_string(),
            request_timeout_ms: 30_000,
            store: StoreConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(WorkerConfig::from_toml_str("").unwrap(), WorkerConfig::default());
    }

    #[test]
    fn nested_store_section() {
        let config = WorkerConfig::from_toml_str(
            r#"
            base_url = "https://lumify.example.com"

            [store]
            entity_capacity = 64
            volatile_fields = ["score", "highlight"]
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "https://lumify.example.com");
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.store.entity_capacity, 64);
        assert_eq!(config.store.volatile_fields, vec!["score", "highlight"]);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            WorkerConfig::from_toml_str("base_url = \"\""),
            Err(WorkerError::Config(_))
        ));
        assert!(matches!(
            WorkerConfig::from_toml_str("[store]\nentity_capacity = 0"),
            Err(WorkerError::Config(_))
        ));
        assert!(matches!(
            WorkerConfig::from_toml_str("request_timeout_ms = \"soon\""),
            Err(WorkerError::Config(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_ms = 500").unwrap();

        let config = WorkerConfig::load(file.path()).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_millis(500));

        let missing = WorkerConfig::load("/nonexistent/lumify-worker.toml");
        assert!(matches!(missing, Err(WorkerError::Io(_))));
    }
}
