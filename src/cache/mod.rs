//! Cache Module
//!
//! Fixed-capacity in-memory cache with strict LRU eviction and TTL expiry.

mod arena;
mod clock;
mod record;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use arena::RecordHandle;
pub use clock::{Clock, ManualClock, SystemClock};
pub use record::{Record, RecordKey};
pub use shared::SharedBubbleCache;
pub use stats::CacheStats;
pub use store::{BubbleCache, Iter};
