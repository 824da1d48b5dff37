//! Bubble Cache Module
//!
//! Main cache engine: a recency chain of records threaded through an arena,
//! a key index for O(1) lookup, fixed capacity with LRU eviction and a
//! uniform TTL checked on fetch.
//!
//! Records that are requested "bubble" up to the top of the chain; the
//! bottom record is the least recently used and is the one evicted when a
//! new key arrives at full capacity.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::cache::arena::Arena;
use crate::cache::{CacheStats, Clock, Record, RecordHandle, RecordKey, SystemClock};
use crate::error::{CacheError, Result};

// == Bubble Cache ==
/// Fixed-capacity LRU cache with TTL expiry.
#[derive(Debug)]
pub struct BubbleCache<K, V, C = SystemClock> {
    /// Owner of every record in the chain
    records: Arena<Record<K, V>>,
    /// Key to record lookup
    index: HashMap<K, RecordHandle>,
    /// Most recently used record
    top: Option<RecordHandle>,
    /// Least recently used record
    bottom: Option<RecordHandle>,
    /// Number of records in the chain
    size: usize,
    capacity: usize,
    /// Seconds a record stays live after its last access
    ttl: u64,
    clock: C,
    stats: CacheStats,
}

impl<K: RecordKey, V> BubbleCache<K, V, SystemClock> {
    // == Constructor ==
    /// Creates a cache reading time from the system clock.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize, ttl: u64) -> Self {
        Self::with_clock(capacity, ttl, SystemClock)
    }
}

impl<K: RecordKey, V, C: Clock> BubbleCache<K, V, C> {
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(capacity: usize, ttl: u64, clock: C) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: Arena::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            top: None,
            bottom: None,
            size: 0,
            capacity,
            ttl,
            clock,
            stats: CacheStats::new(),
        }
    }

    // == Insert ==
    /// Stores `value` under `key` and makes it the top record.
    ///
    /// An existing key is promoted and refreshed in place. A new key at full
    /// capacity first evicts the bottom record. Invalid records are refused
    /// before anything changes.
    pub fn insert(&mut self, key: K, value: impl Into<Option<V>>) -> Result<()> {
        let now = self.clock.now();
        let candidate = Record::new(key, value.into(), now);
        candidate.validate()?;

        if let Some(&handle) = self.index.get(candidate.key.as_str()) {
            if self.top != Some(handle) {
                self.promote(handle);
            }
            let record = self
                .records
                .get_mut(handle)
                .ok_or(CacheError::IntegrityViolation)?;
            record.refresh(candidate.value, now);
            return Ok(());
        }

        if self.size == self.capacity {
            self.evict_bottom()?;
        }

        let key = candidate.key.clone();
        let handle = self.records.insert(candidate);
        self.link_top(handle);
        self.index.insert(key, handle);
        self.size += 1;
        Ok(())
    }

    // == Fetch ==
    /// Returns the value for `key` and promotes its record to the top.
    ///
    /// A record whose TTL has elapsed is removed and reported as expired.
    pub fn fetch(&mut self, key: &str) -> Result<V>
    where
        V: Clone,
    {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        let now = self.clock.now();
        let live = self
            .records
            .get(handle)
            .ok_or(CacheError::IntegrityViolation)?
            .is_live(self.ttl, now);
        if !live {
            self.remove(handle)?;
            self.stats.record_expiration();
            self.stats.record_miss();
            debug!(key, "record expired on fetch");
            return Err(CacheError::Expired(key.to_string()));
        }

        if self.top != Some(handle) {
            self.promote(handle);
        }
        let record = self
            .records
            .get_mut(handle)
            .ok_or(CacheError::IntegrityViolation)?;
        record.touch(now);
        let value = record.value.clone().ok_or(CacheError::IntegrityViolation)?;
        self.stats.record_hit();
        Ok(value)
    }

    // == Exists ==
    /// Index membership only. Ignores TTL and leaves the order untouched.
    pub fn exists(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Is Live ==
    /// Whether the stored record for `key` is still within its TTL.
    pub fn is_live(&self, key: &str) -> Result<bool> {
        let record = self.lookup(key)?;
        Ok(record.is_live(self.ttl, self.clock.now()))
    }

    // == Delete ==
    /// Removes the record for `key`.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        let handle = *self
            .index
            .get(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        self.remove(handle).map(|_| ())
    }

    // == Clear ==
    /// Removes every record, bottom first.
    ///
    /// Refuses to run on a chain that fails the structural self-check, since
    /// walking broken links could strand records.
    pub fn clear(&mut self) -> Result<()> {
        if !self.is_integral() {
            warn!(
                size = self.size,
                "refusing to clear a cache that failed its integrity check"
            );
            return Err(CacheError::IntegrityViolation);
        }

        while self.size > 0 {
            let bottom = self.bottom.ok_or(CacheError::IntegrityViolation)?;
            self.remove(bottom)?;
        }
        Ok(())
    }

    // == Purge Expired ==
    /// Removes all records whose TTL has elapsed and returns how many went.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let mut expired = Vec::new();
        let mut cursor = self.bottom;
        let mut visited = 0;
        while let Some(handle) = cursor {
            let Some(record) = self.records.get(handle) else {
                break;
            };
            visited += 1;
            if visited > self.size {
                break;
            }
            if !record.is_live(self.ttl, now) {
                expired.push(handle);
            }
            cursor = record.upper;
        }

        let mut removed = 0;
        for handle in expired {
            if self.remove(handle).is_ok() {
                self.stats.record_expiration();
                removed += 1;
            }
        }
        removed
    }

    // == Listing ==
    /// Values from most to least recently used.
    pub fn list_values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter()
            .filter_map(|record| record.value.clone())
            .collect()
    }

    /// Records from most to least recently used.
    pub fn list_records(&self) -> Vec<&Record<K, V>> {
        self.iter().collect()
    }

    /// Walks the chain from top to bottom without promoting anything.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            records: &self.records,
            cursor: self.top,
            remaining: self.size,
        }
    }

    /// The most recently used record.
    pub fn peek_top(&self) -> Option<&Record<K, V>> {
        self.top.and_then(|handle| self.records.get(handle))
    }

    /// The least recently used record, next in line for eviction.
    pub fn peek_bottom(&self) -> Option<&Record<K, V>> {
        self.bottom.and_then(|handle| self.records.get(handle))
    }

    // == Accessors ==
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.size);
        stats
    }

    // == Integrity Check ==
    /// Structural self-check of the index and the chain.
    ///
    /// Not needed in normal operation; it exists to detect anomalies. Walks
    /// are bounded by `size` so a cycle cannot hang the check.
    pub fn is_integral(&self) -> bool {
        // Every index entry must resolve to a live record with a value.
        for (key, &handle) in &self.index {
            match self.records.get(handle) {
                Some(record) if record.key == *key && record.value.is_some() => {}
                _ => return false,
            }
        }
        if self.index.len() != self.size || self.records.len() != self.size {
            return false;
        }

        if self.size > self.capacity {
            return false;
        }

        match (self.size, self.top, self.bottom) {
            (0, None, None) => true,
            (0, _, _) => false,
            (1, Some(top), Some(bottom)) => {
                top == bottom
                    && self
                        .records
                        .get(top)
                        .map_or(false, |record| record.is_detached())
            }
            (1, _, _) => false,
            (_, Some(top), Some(bottom)) => {
                let top_is_open = self
                    .records
                    .get(top)
                    .map_or(false, |record| record.upper.is_none());
                let bottom_is_open = self
                    .records
                    .get(bottom)
                    .map_or(false, |record| record.lower.is_none());
                if !top_is_open || !bottom_is_open {
                    return false;
                }

                let downward = self.walk(top, |record| record.lower);
                let upward = self.walk(bottom, |record| record.upper);
                downward == Some((self.size, bottom)) && upward == Some((self.size, top))
            }
            _ => false,
        }
    }

    /// Follows `step` from `start` until a record without a next link.
    ///
    /// Returns the number of records visited and the last one, or `None` if
    /// the walk hit a stale handle or ran past `size` records.
    fn walk(
        &self,
        start: RecordHandle,
        step: impl Fn(&Record<K, V>) -> Option<RecordHandle>,
    ) -> Option<(usize, RecordHandle)> {
        let mut cursor = start;
        let mut visited = 1;
        loop {
            let record = self.records.get(cursor)?;
            match step(record) {
                None => return Some((visited, cursor)),
                Some(next) => {
                    visited += 1;
                    if visited > self.size {
                        return None;
                    }
                    cursor = next;
                }
            }
        }
    }

    fn lookup(&self, key: &str) -> Result<&Record<K, V>> {
        let handle = self
            .index
            .get(key)
            .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
        self.records.get(*handle).ok_or(CacheError::IntegrityViolation)
    }

    // == Removal ==

    fn evict_bottom(&mut self) -> Result<()> {
        let bottom = self.bottom.ok_or(CacheError::EmptyCache)?;
        let record = self.remove(bottom)?;
        self.stats.record_eviction();
        debug!(key = record.key.as_str(), "evicted least recently used record");
        Ok(())
    }

    /// Unlinks a record from the chain, drops it from the index and the
    /// arena, and decrements the size.
    fn remove(&mut self, handle: RecordHandle) -> Result<Record<K, V>> {
        if self.size == 0 {
            return Err(CacheError::EmptyCache);
        }
        if !self.records.contains(handle) {
            return Err(CacheError::IntegrityViolation);
        }

        if self.size == 1 {
            self.top = None;
            self.bottom = None;
        } else if self.top == Some(handle) {
            self.unlink_top();
        } else if self.bottom == Some(handle) {
            self.unlink_bottom();
        } else {
            self.unlink_middle(handle);
        }
        self.size -= 1;

        let mut record = self
            .records
            .remove(handle)
            .ok_or(CacheError::IntegrityViolation)?;
        record.upper = None;
        record.lower = None;
        self.index.remove(record.key.as_str());
        Ok(record)
    }

    // == Chain Links ==
    //
    // The methods below only relink records. They never touch the index or
    // the size counter, and they assume the caller has checked that the
    // operation makes sense for the current shape of the chain.

    /// Moves a record that is not the top to the top ("bubble up").
    fn promote(&mut self, handle: RecordHandle) {
        if self.bottom == Some(handle) {
            self.unlink_bottom();
        } else {
            self.unlink_middle(handle);
        }
        self.link_top(handle);
        trace!(size = self.size, "promoted record to top");
    }

    /// Detaches the top record; its lower neighbour becomes the top.
    fn unlink_top(&mut self) {
        let Some(old_top) = self.top else {
            return;
        };
        let new_top = self.lower_of(old_top);
        self.top = new_top;
        if let Some(new_top) = new_top {
            self.set_upper(new_top, None);
        }
        self.detach(old_top);
    }

    /// Detaches the bottom record; its upper neighbour becomes the bottom.
    fn unlink_bottom(&mut self) {
        let Some(old_bottom) = self.bottom else {
            return;
        };
        let new_bottom = self.upper_of(old_bottom);
        self.bottom = new_bottom;
        if let Some(new_bottom) = new_bottom {
            self.set_lower(new_bottom, None);
        }
        self.detach(old_bottom);
    }

    /// Splices an interior record out by joining its neighbours.
    fn unlink_middle(&mut self, handle: RecordHandle) {
        let upper = self.upper_of(handle);
        let lower = self.lower_of(handle);
        if let Some(upper) = upper {
            self.set_lower(upper, lower);
        }
        if let Some(lower) = lower {
            self.set_upper(lower, upper);
        }
        self.detach(handle);
    }

    /// Attaches a detached record above the current top.
    fn link_top(&mut self, handle: RecordHandle) {
        match self.top {
            None => {
                self.detach(handle);
                self.top = Some(handle);
                self.bottom = Some(handle);
            }
            Some(old_top) => {
                self.set_upper(old_top, Some(handle));
                self.set_upper(handle, None);
                self.set_lower(handle, Some(old_top));
                self.top = Some(handle);
            }
        }
    }

    fn upper_of(&self, handle: RecordHandle) -> Option<RecordHandle> {
        self.records.get(handle).and_then(|record| record.upper)
    }

    fn lower_of(&self, handle: RecordHandle) -> Option<RecordHandle> {
        self.records.get(handle).and_then(|record| record.lower)
    }

    fn set_upper(&mut self, handle: RecordHandle, upper: Option<RecordHandle>) {
        if let Some(record) = self.records.get_mut(handle) {
            record.upper = upper;
        }
    }

    fn set_lower(&mut self, handle: RecordHandle, lower: Option<RecordHandle>) {
        if let Some(record) = self.records.get_mut(handle) {
            record.lower = lower;
        }
    }

    fn detach(&mut self, handle: RecordHandle) {
        self.set_upper(handle, None);
        self.set_lower(handle, None);
    }
}

// == Iterator ==
/// Top-to-bottom iterator over the records of a [`BubbleCache`].
pub struct Iter<'a, K, V> {
    records: &'a Arena<Record<K, V>>,
    cursor: Option<RecordHandle>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Record<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let record = self.records.get(self.cursor?)?;
        self.cursor = record.lower;
        self.remaining -= 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
