//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Every handler takes
//! the engine lock once, so a request never observes a half-applied change.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{Clock, SharedBubbleCache, SystemClock};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, ExistsResponse, GetResponse, HealthResponse, ListResponse,
    RecordView, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// Generic over the clock so tests can drive expiry without sleeping.
pub struct AppState<C = SystemClock> {
    /// Lock-guarded cache of string records
    pub cache: SharedBubbleCache<String, String, C>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl AppState<SystemClock> {
    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(SharedBubbleCache::new(config.capacity, config.ttl))
    }
}

impl<C: Clock> AppState<C> {
    pub fn new(cache: SharedBubbleCache<String, String, C>) -> Self {
        Self { cache }
    }
}

/// Handler for PUT /set
///
/// Inserts or updates a record. A missing or null value is refused by the
/// cache as an empty record value.
pub async fn set_handler<C: Clock + Send + 'static>(
    State(state): State<AppState<C>>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.insert(req.key.clone(), req.value)?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Fetching promotes the record to the top; an expired record is removed
/// and reported as 404.
pub async fn get_handler<C: Clock + Send + 'static>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state.cache.fetch(&key)?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler<C: Clock + Send + 'static>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.cache.delete(&key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /exists/:key
///
/// Reports membership and liveness without touching the recency order.
pub async fn exists_handler<C: Clock + Send + 'static>(
    State(state): State<AppState<C>>,
    Path(key): Path<String>,
) -> Json<ExistsResponse> {
    let cache = state.cache.lock();
    let exists = cache.exists(&key);
    let live = if exists { cache.is_live(&key).ok() } else { None };
    drop(cache);

    Json(ExistsResponse { key, exists, live })
}

/// Handler for GET /records
pub async fn list_handler<C: Clock + Send + 'static>(
    State(state): State<AppState<C>>,
) -> Json<ListResponse> {
    let records: Vec<RecordView> = state.cache.lock().iter().map(RecordView::from).collect();

    Json(ListResponse::new(records))
}

/// Handler for DELETE /records
pub async fn clear_handler<C: Clock + Send + 'static>(
    State(state): State<AppState<C>>,
) -> Result<Json<ClearResponse>> {
    let removed = {
        let mut cache = state.cache.lock();
        let removed = cache.len();
        cache.clear()?;
        removed
    };

    Ok(Json(ClearResponse::new(removed)))
}

/// Handler for GET /stats
pub async fn stats_handler<C: Clock + Send + 'static>(
    State(state): State<AppState<C>>,
) -> Json<StatsResponse> {
    let cache = state.cache.lock();
    let response = StatsResponse::new(&cache.stats(), cache.capacity(), cache.ttl().as_secs());
    drop(cache);

    Json(response)
}

/// Handler for GET /health
///
/// Runs the structural self-check; a broken chain reports "degraded".
pub async fn health_handler<C: Clock + Send + 'static>(
    State(state): State<AppState<C>>,
) -> Json<HealthResponse> {
    Json(HealthResponse::from_integrity(state.cache.is_integral()))
}
