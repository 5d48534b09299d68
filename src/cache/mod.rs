//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod clock;
mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, DEFAULT_TTL_MS};
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::CacheStore;
