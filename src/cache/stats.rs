//! Cache Statistics Module
//!
//! Running counters kept by each store and the report built from them.

use serde::Serialize;

// == Cache Stats ==
/// Running counters for one cache. Only `clear` resets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that returned a live value
    pub hits: u64,
    /// Reads that found nothing or an expired entry
    pub misses: u64,
    /// Calls to `set`
    pub sets: u64,
    /// Explicit deletes, including the implicit delete of an overwritten key
    pub deletes: u64,
    /// Entries removed to stay within capacity
    pub evictions: u64,
    /// Entries removed because their TTL ran out, on read or by the sweep
    pub expirations: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    /// Resets every counter to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Stats Snapshot ==
/// Point-in-time report of one cache's counters, size and capacity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
    pub expirations: u64,
    /// hits / (hits + misses), in the range 0.0..=1.0
    pub hit_rate: f64,
    /// Entries currently stored, including expired ones not yet swept
    pub size: usize,
    pub capacity: usize,
}

impl StatsSnapshot {
    /// Builds a report from running counters.
    pub fn new(stats: &CacheStats, size: usize, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            sets: stats.sets,
            deletes: stats.deletes,
            evictions: stats.evictions,
            expirations: stats.expirations,
            hit_rate: stats.hit_rate(),
            size,
            capacity,
        }
    }

    /// Hit rate formatted as a percentage with two decimals, e.g. `"50.00%"`.
    pub fn hit_rate_percent(&self) -> String {
        format!("{:.2}%", self.hit_rate * 100.0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.hit_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_reset() {
        let mut stats = CacheStats::new();
        stats.record_set();
        stats.record_delete();
        stats.record_eviction();
        stats.record_expirations(3);

        stats.reset();

        assert_eq!(stats, CacheStats::default());
    }

    #[test]
    fn test_snapshot_carries_counters() {
        let mut stats = CacheStats::new();
        stats.record_set();
        stats.record_hit();
        stats.record_miss();
        stats.record_expirations(2);

        let snapshot = StatsSnapshot::new(&stats, 1, 10);

        assert_eq!(snapshot.sets, 1);
        assert_eq!(snapshot.hits, 1);
        assert_eq!(snapshot.misses, 1);
        assert_eq!(snapshot.expirations, 2);
        assert_eq!(snapshot.size, 1);
        assert_eq!(snapshot.capacity, 10);
        assert_eq!(snapshot.hit_rate_percent(), "50.00%");
    }

    #[test]
    fn test_hit_rate_percent_no_requests() {
        let snapshot = StatsSnapshot::new(&CacheStats::new(), 0, 5);
        assert_eq!(snapshot.hit_rate_percent(), "0.00%");
    }

    #[test]
    fn test_snapshot_serialize() {
        let snapshot = StatsSnapshot::new(&CacheStats::new(), 0, 5);
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["capacity"], 5);
        assert_eq!(json["hit_rate"], 0.0);
    }
}
