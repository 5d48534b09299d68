//! Feed Cache - in-process caching for a media sharing feed
//!
//! Provides a bounded LRU cache with per-entry TTL and a background expiry
//! sweep, specialized caches for media, user data and content, a manager
//! that routes by cache name, and memoization of async operations.

pub mod cache;
pub mod caches;
pub mod config;
pub mod error;
pub mod manager;
pub mod memoize;
pub mod tasks;

pub use cache::{Cache, CacheStore, StatsSnapshot};
pub use config::{CacheConfig, ManagerConfig};
pub use error::{CacheError, Result};
pub use manager::{CacheKind, CacheManager};
pub use memoize::{memoize, MemoKey, Memoized, Memoizer};
