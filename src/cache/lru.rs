//! LRU Tracker Module
//!
//! Keeps keys in recency order for eviction tie-breaks and ordered snapshots.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access order for LRU eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = least recently used
/// - Back = most recently used
///
/// The store picks its victim by `last_accessed_at` and uses this order to
/// break ties between entries sharing a timestamp.
#[derive(Debug, Default)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as the most recently used, inserting it if unknown.
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    /// Forgets every key.
    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }

    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
