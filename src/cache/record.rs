//! Cache Record Module
//!
//! Defines the unit of storage held in the recency chain.

use std::borrow::Borrow;
use std::hash::Hash;

use chrono::{DateTime, TimeZone, Utc};

use crate::cache::RecordHandle;
use crate::error::RecordError;

// == Record Key ==
/// Keys are opaque string-like tokens; the empty string is not a valid key.
///
/// Implemented for every `Eq + Hash + Clone` type that borrows as `str`, so
/// `String`, `&'static str`, `Box<str>` and `Arc<str>` all work, and lookups
/// can always be made with a plain `&str`.
pub trait RecordKey: Eq + Hash + Clone + Borrow<str> {
    fn as_str(&self) -> &str {
        <Self as Borrow<str>>::borrow(self)
    }
}

impl<T> RecordKey for T where T: Eq + Hash + Clone + Borrow<str> {}

// == Record ==
/// A single cached value with its access timestamp and chain links.
///
/// `upper` points at the more recently used neighbour, `lower` at the less
/// recently used one. A record outside any chain has both links empty.
#[derive(Debug, Clone)]
pub struct Record<K, V> {
    pub(crate) key: K,
    pub(crate) value: Option<V>,
    /// Unix seconds of the last insert, update or fetch
    pub(crate) last_access_time: i64,
    pub(crate) upper: Option<RecordHandle>,
    pub(crate) lower: Option<RecordHandle>,
}

impl<K: RecordKey, V> Record<K, V> {
    // == Constructor ==
    /// Creates a detached record accessed at `now`.
    pub fn new(key: K, value: Option<V>, now: i64) -> Self {
        Self {
            key,
            value,
            last_access_time: now,
            upper: None,
            lower: None,
        }
    }

    // == Validate ==
    /// Checks the record before insertion. The value is checked first.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.value.is_none() {
            return Err(RecordError::EmptyValue);
        }
        if self.key.as_str().is_empty() {
            return Err(RecordError::EmptyKey);
        }
        Ok(())
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Unix seconds of the last access.
    pub fn last_access_time(&self) -> i64 {
        self.last_access_time
    }

    /// Last access as a UTC datetime, if the timestamp is representable.
    pub fn last_accessed_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.last_access_time, 0).single()
    }

    // == Refresh ==
    /// Replaces the value, then stamps the access time.
    pub fn refresh(&mut self, value: Option<V>, now: i64) {
        self.value = value;
        self.last_access_time = now;
    }

    // == Touch ==
    /// Stamps the access time without changing the value.
    pub fn touch(&mut self, now: i64) {
        self.last_access_time = now;
    }

    // == Is Live ==
    /// True while `now` is strictly before `last_access_time + ttl`.
    ///
    /// A TTL of zero means the record is never live.
    pub fn is_live(&self, ttl: u64, now: i64) -> bool {
        let ttl = i64::try_from(ttl).unwrap_or(i64::MAX);
        now < self.last_access_time.saturating_add(ttl)
    }

    pub(crate) fn is_detached(&self) -> bool {
        self.upper.is_none() && self.lower.is_none()
    }
}
