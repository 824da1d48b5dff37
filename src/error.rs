//! Error types for the bubble cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Record Error Enum ==
/// Reasons a candidate record is refused before it touches the cache.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    /// The record carries no value
    #[error("record value is not set")]
    EmptyValue,

    /// The record key is an empty string
    #[error("record key is not set")]
    EmptyKey,
}

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Candidate record failed validation, nothing was changed
    #[error("Invalid record: {0}")]
    InvalidRecord(#[from] RecordError),

    /// Request exceeded a transport limit
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key was found but its TTL had elapsed; the record has been removed
    #[error("Key expired: {0}")]
    Expired(String),

    /// A removal was attempted on a cache holding no records
    #[error("Cache is empty")]
    EmptyCache,

    /// The record chain failed its structural self-check
    #[error("Cache integrity check failed")]
    IntegrityViolation,
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidRecord(_) => StatusCode::BAD_REQUEST,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Expired(_) => StatusCode::NOT_FOUND,
            CacheError::EmptyCache => StatusCode::CONFLICT,
            CacheError::IntegrityViolation => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
