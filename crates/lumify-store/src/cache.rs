//! Bounded, priority-aware entity cache
//!
//! Records are held in recency order, oldest first. When an insert pushes the
//! cache past capacity, expired records go first, then the lowest-priority
//! record, with ties broken by least recent use.
//!
//! Every dropped record is reported to the observer it was inserted with.
//! Observers are diagnostic only; no caller may rely on a value staying
//! cached, every read goes back through [`EntityCache::get`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Eviction priority of a record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CachePriority {
    /// First to go under pressure
    Low,
    /// Default priority
    #[default]
    Normal,
    /// Resists eviction
    High,
}

/// Why a record left the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionCause {
    /// Overwritten by an insert under the same key
    Replaced,
    /// Dropped to stay within capacity
    Capacity,
    /// Absolute or sliding expiration passed
    Expired,
    /// Removed explicitly
    Removed,
    /// Dropped by [`EntityCache::clear`]
    Cleared,
}

/// Receives records as they leave the cache
pub trait EvictionObserver<V>: Send + Sync {
    /// Called once per dropped record
    fn on_evict(&self, key: &str, value: &V, cause: EvictionCause);
}

/// Observer that logs every removal at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct EvictionLogger;

impl<V> EvictionObserver<V> for EvictionLogger {
    fn on_evict(&self, key: &str, _value: &V, cause: EvictionCause) {
        tracing::debug!(key, ?cause, "removed");
    }
}

/// Per-record policy
pub struct CacheItemOptions<V> {
    /// Eviction priority
    pub priority: CachePriority,
    /// Record expires at this instant
    pub expiration_absolute: Option<Instant>,
    /// Record expires once unread for this long
    pub expiration_sliding: Option<Duration>,
    /// Notified when the record is dropped
    pub on_evict: Option<Arc<dyn EvictionObserver<V>>>,
}

impl<V> CacheItemOptions<V> {
    /// Normal priority, no expiration, no observer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            priority: CachePriority::Normal,
            expiration_absolute: None,
            expiration_sliding: None,
            on_evict: None,
        }
    }

    /// With priority
    #[inline]
    #[must_use]
    pub fn with_priority(mut self, priority: CachePriority) -> Self {
        self.priority = priority;
        self
    }

    /// With absolute expiration
    #[inline]
    #[must_use]
    pub fn with_absolute_expiration(mut self, at: Instant) -> Self {
        self.expiration_absolute = Some(at);
        self
    }

    /// With sliding expiration
    #[inline]
    #[must_use]
    pub fn with_sliding_expiration(mut self, idle: Duration) -> Self {
        self.expiration_sliding = Some(idle);
        self
    }

    /// With eviction observer
    #[inline]
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn EvictionObserver<V>>) -> Self {
        self.on_evict = Some(observer);
        self
    }
}

impl<V> Default for CacheItemOptions<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for CacheItemOptions<V> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            expiration_absolute: self.expiration_absolute,
            expiration_sliding: self.expiration_sliding,
            on_evict: self.on_evict.clone(),
        }
    }
}

impl<V> fmt::Debug for CacheItemOptions<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheItemOptions")
            .field("priority", &self.priority)
            .field("expiration_absolute", &self.expiration_absolute)
            .field("expiration_sliding", &self.expiration_sliding)
            .field("on_evict", &self.on_evict.is_some())
            .finish()
    }
}

/// Counters for cache diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Live records
    pub entry_count: usize,
    /// Reads that found a live record
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Inserts, including replacements
    pub inserts: u64,
    /// Records dropped by an insert under the same key
    pub replacements: u64,
    /// Records dropped for capacity or expiration
    pub evictions: u64,
}

struct Record<V> {
    value: V,
    options: CacheItemOptions<V>,
    last_accessed: Instant,
}

impl<V> Record<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.options
            .expiration_absolute
            .is_some_and(|at| now >= at)
            || self
                .options
                .expiration_sliding
                .is_some_and(|idle| now.saturating_duration_since(self.last_accessed) >= idle)
    }

    fn notify(&self, key: &str, cause: EvictionCause) {
        if let Some(observer) = &self.options.on_evict {
            observer.on_evict(key, &self.value, cause);
        }
    }
}

/// Key → value cache for a single entity kind
pub struct EntityCache<V> {
    capacity: usize,
    records: IndexMap<String, Record<V>>,
    stats: CacheStats,
}

impl<V> EntityCache<V> {
    /// Create cache holding at most `capacity` records (minimum one)
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: IndexMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Read a record and mark it recently used
    ///
    /// An expired record is dropped and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let now = Instant::now();
        let Some(index) = self.records.get_index_of(key) else {
            self.stats.misses += 1;
            return None;
        };

        if self.records[index].is_expired(now) {
            self.drop_index(index, EvictionCause::Expired);
            self.stats.misses += 1;
            return None;
        }

        let last = self.records.len() - 1;
        self.records.move_index(index, last);
        self.stats.hits += 1;

        let (_, record) = self.records.get_index_mut(last)?;
        record.last_accessed = now;
        Some(&record.value)
    }

    /// Read a record without touching recency or counters
    ///
    /// Expired records read as absent but stay in place until a
    /// [`get`](Self::get) or a capacity purge drops them.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<&V> {
        let record = self.records.get(key)?;
        if record.is_expired(Instant::now()) {
            return None;
        }
        Some(&record.value)
    }

    /// Check for a live record
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.peek(key).is_some()
    }

    /// Insert or replace a record
    ///
    /// Replacing resets the record's policy and recency; the old record's
    /// observer sees [`EvictionCause::Replaced`].
    pub fn insert(&mut self, key: impl Into<String>, value: V, options: CacheItemOptions<V>) {
        let key = key.into();
        if let Some(old) = self.records.shift_remove(&key) {
            old.notify(&key, EvictionCause::Replaced);
            self.stats.replacements += 1;
        }

        self.records.insert(
            key,
            Record {
                value,
                options,
                last_accessed: Instant::now(),
            },
        );
        self.stats.inserts += 1;
        self.purge();
    }

    /// Remove a record
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let record = self.records.shift_remove(key)?;
        record.notify(key, EvictionCause::Removed);
        Some(record.value)
    }

    /// Drop every record
    pub fn clear(&mut self) {
        for (key, record) in self.records.drain(..) {
            record.notify(&key, EvictionCause::Cleared);
        }
    }

    /// Number of stored records, including expired ones not yet purged
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if cache is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of records
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys in recency order, oldest first
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.records.len(),
            ..self.stats
        }
    }

    fn purge(&mut self) {
        while self.records.len() > self.capacity {
            let Some((index, cause)) = self.eviction_candidate() else {
                break;
            };
            self.drop_index(index, cause);
        }
    }

    fn eviction_candidate(&self) -> Option<(usize, EvictionCause)> {
        let now = Instant::now();
        if let Some(index) = self.records.values().position(|r| r.is_expired(now)) {
            return Some((index, EvictionCause::Expired));
        }

        // min_by_key keeps the first minimum, which is the least recently used
        self.records
            .values()
            .enumerate()
            .min_by_key(|(_, r)| r.options.priority)
            .map(|(index, _)| (index, EvictionCause::Capacity))
    }

    fn drop_index(&mut self, index: usize, cause: EvictionCause) {
        if let Some((key, record)) = self.records.shift_remove_index(index) {
            tracing::trace!(key = key.as_str(), ?cause, "evicting record");
            record.notify(&key, cause);
            self.stats.evictions += 1;
        }
    }
}

impl<V> fmt::Debug for EntityCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("capacity", &self.capacity)
            .field("len", &self.records.len())
            .field("stats", &self.stats)
            .finish()
    }
}
