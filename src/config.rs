//! Configuration Module
//!
//! Loads host configuration from environment variables.

use std::env;

/// Host configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of records the cache holds (0 is raised to 1)
    pub capacity: usize,
    /// Seconds a record stays live after its last access
    pub ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between background sweeps of expired records, 0 disables them
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum records (default: 1000)
    /// - `CACHE_TTL` - Record TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expired-record sweep frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            ttl: parse_var("CACHE_TTL").unwrap_or(defaults.ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            ttl: 300,
            server_port: 3000,
            sweep_interval: 1,
        }
    }
}
