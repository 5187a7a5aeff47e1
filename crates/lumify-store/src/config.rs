//! Store configuration

use crate::error::StoreError;
use serde::{Deserialize, Serialize};

/// Default per-kind capacity of a workspace cache
pub const DEFAULT_ENTITY_CAPACITY: usize = 10_000;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum vertices (and, separately, edges) held per workspace
    pub entity_capacity: usize,
    /// Top-level fields stripped before comparison and storage
    pub volatile_fields: Vec<String>,
}

impl StoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With per-kind capacity
    #[inline]
    #[must_use]
    pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// With volatile field list
    #[must_use]
    pub fn with_volatile_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.volatile_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Parse from a TOML document
    ///
    /// # Errors
    /// `StoreError::Config` if the document is not valid TOML or has
    /// mistyped fields. Missing fields take their defaults.
    pub fn from_toml_str(document: &str) -> Result<Self, StoreError> {
        Ok(toml::from_str(document)?)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            entity_capacity: DEFAULT_ENTITY_CAPACITY,
            // search responses carry a relevance score per hit
            volatile_fields: vec!["score".to_string()],
        }
    }
}
