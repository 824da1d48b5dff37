//! Shared Cache Module
//!
//! Thread-safe handle to a [`BubbleCache`]. The index and the chain are
//! guarded by one lock for the whole engine; every operation, reads
//! included, runs inside that single critical section.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, MutexGuard};

use crate::cache::{BubbleCache, CacheStats, Clock, Record, RecordKey, SystemClock};
use crate::error::Result;

// == Shared Bubble Cache ==
/// Cloneable, lock-guarded cache handle.
///
/// Clones share the same cache. Each instance is independent; there is no
/// process-wide default.
#[derive(Debug)]
pub struct SharedBubbleCache<K, V, C = SystemClock> {
    inner: Arc<Mutex<BubbleCache<K, V, C>>>,
}

impl<K, V, C> Clone for SharedBubbleCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: RecordKey, V> SharedBubbleCache<K, V, SystemClock> {
    /// Creates a shared cache reading time from the system clock.
    pub fn new(capacity: usize, ttl: u64) -> Self {
        Self::from_cache(BubbleCache::new(capacity, ttl))
    }
}

impl<K: RecordKey, V, C: Clock> SharedBubbleCache<K, V, C> {
    pub fn from_cache(cache: BubbleCache<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Locks the engine for a sequence of operations that must not interleave
    /// with other callers.
    pub fn lock(&self) -> MutexGuard<'_, BubbleCache<K, V, C>> {
        self.inner.lock()
    }

    pub fn insert(&self, key: K, value: impl Into<Option<V>>) -> Result<()> {
        self.inner.lock().insert(key, value)
    }

    pub fn fetch(&self, key: &str) -> Result<V>
    where
        V: Clone,
    {
        self.inner.lock().fetch(key)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.inner.lock().exists(key)
    }

    pub fn is_live(&self, key: &str) -> Result<bool> {
        self.inner.lock().is_live(key)
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.inner.lock().delete(key)
    }

    pub fn clear(&self) -> Result<()> {
        self.inner.lock().clear()
    }

    pub fn purge_expired(&self) -> usize {
        self.inner.lock().purge_expired()
    }

    pub fn list_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.inner.lock().list_values()
    }

    /// Owned copies of the records, top to bottom; borrows cannot outlive
    /// the lock.
    pub fn list_records(&self) -> Vec<Record<K, V>>
    where
        V: Clone,
    {
        self.inner.lock().iter().cloned().collect()
    }

    pub fn is_integral(&self) -> bool {
        self.inner.lock().is_integral()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn ttl(&self) -> Duration {
        self.inner.lock().ttl()
    }
}
