//! Media Cache
//!
//! Decoded media assets keyed by their source URL.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{Cache, Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;

/// Cache of decoded media assets keyed by source URL.
#[derive(Debug)]
pub struct MediaCache<V> {
    cache: Cache<V>,
}

impl<V> MediaCache<V>
where
    V: Clone + Send + 'static,
{
    pub const NAME: &'static str = "media";

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

    pub fn get_asset(&self, url: &str) -> Option<V> {
        self.cache.get(url)
    }

    pub fn set_asset(&self, url: impl Into<String>, asset: V, ttl_ms: Option<u64>) {
        self.cache.set(url, asset, ttl_ms);
    }

    /// Looks up `primary`, then `fallback` if the primary key misses.
    ///
    /// The fallback is a second key in this same cache, typically a
    /// placeholder or lower resolution asset.
    pub fn get_with_fallback(&self, primary: &str, fallback: Option<&str>) -> Option<V> {
        self.cache
            .get(primary)
            .or_else(|| fallback.and_then(|key| self.cache.get(key)))
    }

    /// Returns the cached asset for `url`, loading it on a miss.
    ///
    /// A successful load is cached under `url` with the default TTL. A failed
    /// load is returned unchanged and nothing is cached. The store lock is
    /// not held while the loader runs.
    pub async fn preload<F, Fut, E>(&self, url: &str, loader: F) -> std::result::Result<V, E>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if let Some(asset) = self.cache.get(url) {
            return Ok(asset);
        }

        debug!(url, "Loading media asset");
        let asset = loader(url.to_string()).await?;
        self.cache.set(url, asset.clone(), None);
        Ok(asset)
    }
}
