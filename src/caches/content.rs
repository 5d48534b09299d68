//! Content Cache
//!
//! Individual posts, the trending list and search results.

use std::fmt::Display;
use std::sync::Arc;

use crate::cache::{Cache, Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;

/// TTL for a single cached post (20 minutes).
pub const POST_TTL_MS: u64 = 20 * 60_000;

/// TTL for the trending list (5 minutes).
pub const TRENDING_TTL_MS: u64 = 5 * 60_000;

/// TTL for search results (10 minutes).
pub const SEARCH_TTL_MS: u64 = 10 * 60_000;

/// Key of the singleton trending list.
pub const TRENDING_KEY: &str = "trending";

pub fn post_key(post_id: impl Display) -> String {
    format!("post:{post_id}")
}

/// Builds the search key from a query trimmed, lowercased and with runs of
/// whitespace collapsed, so equivalent queries share an entry.
pub fn search_key(query: &str) -> String {
    let normalized = query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    format!("search:{normalized}")
}

/// Cache of posts, trending lists and search results.
#[derive(Debug)]
pub struct ContentCache<V> {
    cache: Cache<V>,
}

impl<V> ContentCache<V>
where
    V: Clone + Send + 'static,
{
    pub const NAME: &'static str = "content";

    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self {
            cache: Cache::with_clock(Self::NAME, config, clock)?,
        })
    }

    /// The underlying generic cache.
    pub fn cache(&self) -> &Cache<V> {
        &self.cache
    }

    pub fn get_post(&self, post_id: impl Display) -> Option<V> {
        self.cache.get(&post_key(post_id))
    }

    pub fn set_post(&self, post_id: impl Display, post: V) {
        self.cache.set(post_key(post_id), post, Some(POST_TTL_MS));
    }

    /// Drops a cached post after it was edited or removed upstream.
    pub fn invalidate_post(&self, post_id: impl Display) -> bool {
        self.cache.delete(&post_key(post_id))
    }

    pub fn get_trending(&self) -> Option<V> {
        self.cache.get(TRENDING_KEY)
    }

    pub fn set_trending(&self, trending: V) {
        self.cache.set(TRENDING_KEY, trending, Some(TRENDING_TTL_MS));
    }

    pub fn get_search(&self, query: &str) -> Option<V> {
        self.cache.get(&search_key(query))
    }

    pub fn set_search(&self, query: &str, results: V) {
        self.cache.set(search_key(query), results, Some(SEARCH_TTL_MS));
    }
}
