//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, exists_handler, get_handler, health_handler, list_handler,
    set_handler, stats_handler, AppState,
};
use crate::cache::Clock;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Insert or update a record
/// - `GET /get/:key` - Fetch a value and promote its record
/// - `DELETE /del/:key` - Delete a record
/// - `GET /exists/:key` - Membership and liveness, order untouched
/// - `GET /records` - All records, most recently used first
/// - `DELETE /records` - Remove every record
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check with the structural self-check
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router<C>(state: AppState<C>) -> Router
where
    C: Clock + Send + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler::<C>))
        .route("/get/:key", get(get_handler::<C>))
        .route("/del/:key", delete(delete_handler::<C>))
        .route("/exists/:key", get(exists_handler::<C>))
        .route("/records", get(list_handler::<C>).delete(clear_handler::<C>))
        .route("/stats", get(stats_handler::<C>))
        .route("/health", get(health_handler::<C>))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
