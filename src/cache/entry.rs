//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access tracking.

// == Public Constants ==
/// TTL applied when an entry is built without an explicit one (5 minutes).
pub const DEFAULT_TTL_MS: u64 = 300_000;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// All timestamps are Unix milliseconds supplied by the owning store's clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key this entry is stored under
    pub key: String,
    /// The stored value
    pub value: V,
    /// Creation timestamp, never changes after construction
    pub created_at: u64,
    /// Timestamp of the last successful read
    pub last_accessed_at: u64,
    /// Number of successful reads
    pub access_count: u64,
    /// Time-to-live in milliseconds, measured from `created_at`
    pub ttl_ms: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry created and last accessed at `now`.
    ///
    /// # Arguments
    /// * `key` - The key the entry is stored under
    /// * `value` - The value to store
    /// * `ttl_ms` - TTL in milliseconds
    /// * `now` - Current Unix timestamp in milliseconds
    pub fn new(key: impl Into<String>, value: V, ttl_ms: u64, now: u64) -> Self {
        Self {
            key: key.into(),
            value,
            created_at: now,
            last_accessed_at: now,
            access_count: 0,
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry whose age equals its TTL is still live; it expires once the
    /// age strictly exceeds the TTL.
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.age(now) > self.ttl_ms
    }

    // == Touch ==
    /// Records a successful read.
    pub fn touch(&mut self, now: u64) {
        self.last_accessed_at = now;
        self.access_count += 1;
    }

    /// Milliseconds since creation.
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }

    /// Milliseconds since the last successful read (or creation).
    pub fn idle_time(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_accessed_at)
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, `0` once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.ttl_ms.saturating_sub(self.age(now))
    }
}
