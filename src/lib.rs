//! Bubble Cache - A fixed-capacity in-process LRU cache
//!
//! Records bubble to the top on every access; the least recently used
//! record is evicted from the bottom once capacity is reached. Records also
//! expire after a fixed TTL, and the chain can verify its own structure.
//!
//! The engine lives in [`cache`]. The remaining modules host it behind a
//! small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{BubbleCache, SharedBubbleCache};
pub use config::Config;
pub use error::{CacheError, RecordError};
pub use tasks::spawn_sweep_task;
