//! Change detection for incoming entities
//!
//! Incoming payloads are normalized (volatile fields stripped) and compared
//! structurally against the cached copy.

use crate::config::StoreConfig;
use crate::entity::GraphEntity;

/// Outcome of comparing an incoming entity with the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// No cached copy existed; cached silently
    New,
    /// Identical to the cached copy; not written
    Unchanged,
    /// Differs from the cached copy; written and reported
    Updated,
}

/// Stateless comparator configured with the volatile field list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeDetector {
    volatile_fields: Vec<String>,
}

impl ChangeDetector {
    /// Create detector stripping the given fields
    #[must_use]
    pub fn new<I, S>(volatile_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            volatile_fields: volatile_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create detector from store configuration
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.volatile_fields.iter().cloned())
    }

    /// Fields this detector strips
    #[inline]
    #[must_use]
    pub fn volatile_fields(&self) -> &[String] {
        &self.volatile_fields
    }

    /// Strip volatile fields in place
    pub fn normalize<E: GraphEntity>(&self, entity: &mut E) {
        let stripped = entity.strip_fields(&self.volatile_fields);
        if stripped > 0 {
            tracing::trace!(id = entity.id(), stripped, "stripped volatile fields");
        }
    }

    /// Classify `incoming` against the cached copy
    ///
    /// Both sides must already be normalized.
    #[must_use]
    pub fn classify<E: GraphEntity>(previous: Option<&E>, incoming: &E) -> Change {
        match previous {
            None => Change::New,
            Some(previous) if previous == incoming => Change::Unchanged,
            Some(_) => Change::Updated,
        }
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

/// Per-batch classification counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Entities seen for the first time
    pub new: usize,
    /// Entities identical to their cached copy
    pub unchanged: usize,
    /// Entities that replaced a different cached copy
    pub updated: usize,
    /// Whether a `storeObjectsUpdated` message was sent
    pub notified: bool,
}

impl BatchReport {
    /// Count one classification
    pub fn record(&mut self, change: Change) {
        match change {
            Change::New => self.new += 1,
            Change::Unchanged => self.unchanged += 1,
            Change::Updated => self.updated += 1,
        }
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: Self) {
        self.new += other.new;
        self.unchanged += other.unchanged;
        self.updated += other.updated;
        self.notified |= other.notified;
    }

    /// Entities written to the cache
    #[inline]
    #[must_use]
    pub fn written(&self) -> usize {
        self.new + self.updated
    }

    /// Total entities considered
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.new + self.unchanged + self.updated
    }
}
