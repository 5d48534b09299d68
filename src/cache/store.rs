//! Cache Store Module
//!
//! Synchronous cache engine combining HashMap storage with LRU tracking and
//! TTL expiration. Every method runs to completion without suspending.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, LruTracker, StatsSnapshot, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Bounded key-value store with LRU eviction and per-entry TTL.
///
/// Invariant: `len() <= capacity()` once any `set` returns.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Recency order of exactly the keys in `entries`
    lru: LruTracker,
    stats: CacheStats,
    capacity: usize,
    default_ttl_ms: u64,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store reading the wall clock.
    ///
    /// # Errors
    /// `CacheError::InvalidConfig` if `capacity` or `default_ttl_ms` is 0.
    pub fn new(capacity: usize, default_ttl_ms: u64) -> Result<Self> {
        Self::with_clock(capacity, default_ttl_ms, Arc::new(SystemClock))
    }

    /// Creates a store that reads time from `clock`.
    pub fn with_clock(
        capacity: usize,
        default_ttl_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if default_ttl_ms == 0 {
            return Err(CacheError::InvalidConfig(
                "default TTL must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity,
            default_ttl_ms,
            clock,
        })
    }

    /// Creates a store sized by `config`.
    pub fn from_config(config: &CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        Self::with_clock(config.capacity, config.default_ttl_ms, clock)
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// Replacing an entry counts as a delete followed by a set. When the
    /// insert pushes the store over capacity, exactly one least recently
    /// used entry is evicted.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl_ms` - Optional TTL in milliseconds (uses the default if None)
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl_ms: Option<u64>) {
        let key = key.into();
        let now = self.clock.now_ms();

        if self.entries.remove(&key).is_some() {
            self.lru.remove(&key);
            self.stats.record_delete();
        }

        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);
        self.entries.insert(key.clone(), CacheEntry::new(key.clone(), value, ttl_ms, now));
        self.lru.touch(&key);
        self.stats.record_set();

        if self.entries.len() > self.capacity {
            self.evict_lru();
        }
    }

    // == Get ==
    /// Returns a live value and records the access.
    ///
    /// Missing and expired keys are misses; an expired entry is removed.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired_at(now) {
            self.remove_expired(key);
            self.stats.record_miss();
            return None;
        }

        entry.touch(now);
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(value)
    }

    // == Has ==
    /// Checks for a live entry without counting a hit or miss.
    ///
    /// Expired entries are still removed.
    pub fn has(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired_at(now),
            None => return false,
        };

        if expired {
            self.remove_expired(key);
        }
        !expired
    }

    // == Peek ==
    /// Looks at an entry with no side effects at all, expired or not.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Delete ==
    /// Removes an entry. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.record_delete();
            true
        } else {
            false
        }
    }

    // == Clear ==
    /// Drops every entry and resets all counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.reset();
    }

    // == Sweep Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed. These count as expirations,
    /// never as deletes or evictions.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns a snapshot of the counters together with size and capacity.
    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot::new(&self.stats, self.entries.len(), self.capacity)
    }

    // == Snapshots ==
    // None of these check expiry; they may include entries awaiting the sweep.

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lru.iter().map(str::to_string).collect()
    }

    /// Values from least to most recently used.
    pub fn values(&self) -> Vec<V> {
        self.lru
            .iter()
            .filter_map(|key| self.entries.get(key))
            .map(|entry| entry.value.clone())
            .collect()
    }

    /// Key-value pairs from least to most recently used.
    pub fn entries(&self) -> Vec<(String, V)> {
        self.lru
            .iter()
            .filter_map(|key| self.entries.get(key))
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl_ms(&self) -> u64 {
        self.default_ttl_ms
    }

    fn remove_expired(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.record_expirations(1);
        debug!(key, "Removed expired entry on read");
    }

    /// Evicts the entry with the smallest `last_accessed_at`.
    ///
    /// Ties go to the key earliest in recency order. The timestamp decides
    /// even when the clock has stepped backwards.
    fn evict_lru(&mut self) {
        let Some(evicted) = self
            .lru
            .iter()
            .filter_map(|key| self.entries.get(key))
            .min_by_key(|entry| entry.last_accessed_at)
            .map(|entry| entry.key.clone())
        else {
            return;
        };

        self.entries.remove(&evicted);
        self.lru.remove(&evicted);
        self.stats.record_eviction();
        debug!(key = %evicted, "Evicted least recently used entry");
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn store_with_clock(capacity: usize) -> (CacheStore<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let store = CacheStore::with_clock(capacity, 300_000, clock.clone()).unwrap();
        (store, clock)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(100, 300_000).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.default_ttl_ms(), 300_000);
    }

    #[test]
    fn test_store_rejects_invalid_config() {
        assert!(matches!(
            CacheStore::<String>::new(0, 300_000),
            Err(CacheError::InvalidConfig(_))
        ));
        assert!(matches!(
            CacheStore::<String>::new(10, 0),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock(100);

        store.set("key1", "value1".to_string(), None);

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock(100);

        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_get_touches_entry() {
        let (mut store, clock) = store_with_clock(100);
        store.set("key1", "value1".to_string(), None);

        clock.advance(10);
        store.get("key1");
        clock.advance(10);
        store.get("key1");

        let entry = store.peek("key1").unwrap();
        assert_eq!(entry.access_count, 2);
        assert_eq!(entry.last_accessed_at, 1_000_020);
        assert_eq!(entry.created_at, 1_000_000);
    }

    #[test]
    fn test_store_ttl_expiration_with_simulated_time() {
        let (mut store, clock) = store_with_clock(100);
        store.set("k", "v".to_string(), Some(100));

        clock.advance(50);
        assert_eq!(store.get("k").as_deref(), Some("v"));

        clock.advance(100);
        assert_eq!(store.get("k"), None);
        assert!(store.is_empty(), "expired entry should be removed on read");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.deletes, 0);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_store_has_does_not_count_or_touch() {
        let (mut store, clock) = store_with_clock(100);
        store.set("k", "v".to_string(), Some(100));

        assert!(store.has("k"));
        assert!(!store.has("missing"));
        assert_eq!(store.peek("k").unwrap().access_count, 0);

        clock.advance(101);
        assert!(!store.has("k"));
        assert!(store.is_empty());

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_store_has_does_not_refresh_recency() {
        // Same timestamp throughout, so only recency order separates a and b
        let (mut store, _) = store_with_clock(2);

        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);
        assert!(store.has("a"));
        store.set("c", "3".to_string(), None);

        assert_eq!(store.keys(), vec!["b", "c"]);
        assert!(store.peek("a").is_none());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_evicts_oldest_access_time_after_clock_steps_back() {
        let clock = Arc::new(ManualClock::new(1_000));
        let mut store = CacheStore::with_clock(2, 300_000, clock.clone()).unwrap();

        store.set("a", "1".to_string(), None);
        clock.set(2_000);
        store.set("b", "2".to_string(), None);
        clock.set(500);
        store.get("b");

        assert_eq!(store.peek("a").unwrap().last_accessed_at, 1_000);
        assert_eq!(store.peek("b").unwrap().last_accessed_at, 500);

        store.set("c", "3".to_string(), None);

        assert!(store.peek("b").is_none(), "b has the oldest access time");
        assert!(store.peek("a").is_some());
        assert!(store.peek("c").is_some());
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = store_with_clock(100);
        store.set("key1", "value1".to_string(), None);

        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));
        assert!(store.is_empty());
        assert_eq!(store.stats().deletes, 1);
    }

    #[test]
    fn test_store_overwrite_counts_delete() {
        let (mut store, _) = store_with_clock(100);

        store.set("key1", "value1".to_string(), None);
        store.set("key1", "value2".to_string(), None);

        assert_eq!(store.get("key1").as_deref(), Some("value2"));
        assert_eq!(store.len(), 1);

        let stats = store.stats();
        assert_eq!(stats.sets, 2);
        assert_eq!(stats.deletes, 1);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_store_overwrite_resets_metadata() {
        let (mut store, clock) = store_with_clock(100);
        store.set("key1", "value1".to_string(), None);
        store.get("key1");

        clock.advance(500);
        store.set("key1", "value2".to_string(), Some(42));

        let entry = store.peek("key1").unwrap();
        assert_eq!(entry.created_at, 1_000_500);
        assert_eq!(entry.access_count, 0);
        assert_eq!(entry.ttl_ms, 42);
    }

    #[test]
    fn test_store_lru_eviction() {
        let (mut store, _) = store_with_clock(2);

        store.set("a", "1".to_string(), None);
        store.set("b", "2".to_string(), None);
        store.get("a");
        store.set("c", "3".to_string(), None);

        assert_eq!(store.len(), 2);
        assert!(store.has("a"));
        assert!(!store.has("b"));
        assert!(store.has("c"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_eviction_by_access_time() {
        let (mut store, clock) = store_with_clock(3);

        store.set("key1", "value1".to_string(), None);
        clock.advance(1);
        store.set("key2", "value2".to_string(), None);
        clock.advance(1);
        store.set("key3", "value3".to_string(), None);
        clock.advance(1);
        store.get("key1");
        clock.advance(1);

        store.set("key4", "value4".to_string(), None);

        assert!(store.has("key1"));
        assert!(!store.has("key2"));
        assert!(store.has("key3"));
        assert!(store.has("key4"));
    }

    #[test]
    fn test_store_single_set_evicts_at_most_once() {
        let (mut store, _) = store_with_clock(3);
        for i in 0..10 {
            store.set(format!("key{i}"), i.to_string(), None);
            assert!(store.len() <= 3);
        }

        assert_eq!(store.stats().evictions, 7);
        assert_eq!(store.keys(), vec!["key7", "key8", "key9"]);
    }

    #[test]
    fn test_store_stats_accounting() {
        let (mut store, _) = store_with_clock(100);

        store.set("key1", "value1".to_string(), None);
        store.get("key1");
        store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.capacity, 100);
        assert_eq!(stats.hit_rate_percent(), "50.00%");
    }

    #[test]
    fn test_store_clear_is_idempotent() {
        let (mut store, _) = store_with_clock(100);
        store.set("key1", "value1".to_string(), None);
        store.get("key1");
        store.get("missing");

        for _ in 0..2 {
            store.clear();
            let stats = store.stats();
            assert_eq!(store.len(), 0);
            assert_eq!(stats.hits, 0);
            assert_eq!(stats.misses, 0);
            assert_eq!(stats.sets, 0);
            assert_eq!(stats.deletes, 0);
            assert_eq!(stats.evictions, 0);
            assert_eq!(stats.expirations, 0);
        }
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_store_sweep_expired() {
        let (mut store, clock) = store_with_clock(100);
        store.set("short", "1".to_string(), Some(1_000));
        store.set("long", "2".to_string(), Some(10_000));

        clock.advance(1_001);
        assert_eq!(store.sweep_expired(), 1);
        assert_eq!(store.sweep_expired(), 0);

        assert_eq!(store.len(), 1);
        assert_eq!(store.keys(), vec!["long"]);

        let stats = store.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.deletes, 0);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_store_snapshots_skip_expiry_checks() {
        let (mut store, clock) = store_with_clock(100);
        store.set("a", "1".to_string(), Some(10));
        store.set("b", "2".to_string(), None);

        clock.advance(1_000);

        assert_eq!(store.len(), 2);
        assert_eq!(store.keys(), vec!["a", "b"]);
        assert_eq!(store.values(), vec!["1".to_string(), "2".to_string()]);
        assert_eq!(
            store.entries(),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string())
            ]
        );
        assert_eq!(store.stats().expirations, 0);
    }

    #[test]
    fn test_store_from_config() {
        let config = CacheConfig::new(5, 1_000, 1_000);
        let store: CacheStore<u8> =
            CacheStore::from_config(&config, Arc::new(ManualClock::new(0))).unwrap();
        assert_eq!(store.capacity(), 5);

        let bad = CacheConfig::new(5, 1_000, 0);
        assert!(CacheStore::<u8>::from_config(&bad, Arc::new(ManualClock::new(0))).is_err());
    }
}
