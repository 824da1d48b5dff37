//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

/// Request body for the SET operation (PUT /set)
///
/// `value` is optional on the wire so that a missing or null value reaches
/// the cache and is refused there as an empty record value.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    #[serde(default)]
    pub value: Option<String>,
}

impl SetRequest {
    /// Checks the transport size limits.
    ///
    /// Returns an error message if validation fails, None if valid. Empty
    /// keys and values are left to the cache's own record validation.
    pub fn validate(&self) -> Option<String> {
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        if self.value.as_ref().map_or(0, String::len) > MAX_VALUE_SIZE {
            return Some(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            ));
        }
        None
    }
}
