//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, Record};

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for GET /exists/:key
///
/// `live` is null when the key is absent.
#[derive(Debug, Clone, Serialize)]
pub struct ExistsResponse {
    pub key: String,
    pub exists: bool,
    pub live: Option<bool>,
}

/// One record of the GET /records listing
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub key: String,
    pub value: Option<String>,
    /// Last access in RFC 3339
    pub last_access: Option<String>,
}

impl From<&Record<String, String>> for RecordView {
    fn from(record: &Record<String, String>) -> Self {
        Self {
            key: record.key().clone(),
            value: record.value().cloned(),
            last_access: record.last_accessed_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Response body for GET /records, most recently used first
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub records: Vec<RecordView>,
}

impl ListResponse {
    pub fn new(records: Vec<RecordView>) -> Self {
        Self {
            count: records.len(),
            records,
        }
    }
}

/// Response body for DELETE /records
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Number of records that were removed
    pub removed: usize,
}

impl ClearResponse {
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} records", removed),
            removed,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// Current number of records in cache
    pub total_entries: usize,
    pub capacity: usize,
    /// Record TTL in seconds
    pub ttl: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, capacity: usize, ttl: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            capacity,
            ttl,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// "healthy", or "degraded" when the structural self-check fails
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Result of the cache's structural self-check
    pub integral: bool,
}

impl HealthResponse {
    pub fn from_integrity(integral: bool) -> Self {
        Self {
            status: if integral { "healthy" } else { "degraded" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            integral,
        }
    }
}
