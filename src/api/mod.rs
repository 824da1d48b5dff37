//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Insert or update a record
//! - `GET /get/:key` - Fetch a value by key
//! - `DELETE /del/:key` - Delete a record
//! - `GET /exists/:key` - Membership and liveness
//! - `GET /records` / `DELETE /records` - List or clear all records
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
