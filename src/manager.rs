//! Cache Manager
//!
//! Owns one cache per content domain and routes operations by cache name.
//!
//! The manager is constructed explicitly and handed to whatever layer needs
//! caching; `shutdown` stops every background sweep at process teardown.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::cache::{Cache, Clock, StatsSnapshot, SystemClock};
use crate::caches::{ContentCache, MediaCache, UserDataCache};
use crate::config::ManagerConfig;
use crate::error::Result;
use crate::memoize::{memoize, MemoKey, Memoizer};

// == Cache Kind ==
/// The four caches a manager owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKind {
    General,
    Media,
    Users,
    Content,
}

impl CacheKind {
    pub const ALL: [CacheKind; 4] = [
        CacheKind::General,
        CacheKind::Media,
        CacheKind::Users,
        CacheKind::Content,
    ];

    /// Maps a cache name to its kind. Unknown names map to `General`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "media" => CacheKind::Media,
            "users" => CacheKind::Users,
            "content" => CacheKind::Content,
            _ => CacheKind::General,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CacheKind::General => "general",
            CacheKind::Media => "media",
            CacheKind::Users => "users",
            CacheKind::Content => "content",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// == Cache Manager ==
/// Owns the `general`, `media`, `users` and `content` caches.
#[derive(Debug)]
pub struct CacheManager<V = serde_json::Value> {
    general: Cache<V>,
    media: MediaCache<V>,
    users: UserDataCache<V>,
    content: ContentCache<V>,
}

impl<V> CacheManager<V>
where
    V: Clone + Send + 'static,
{
    /// Builds all four caches and starts their sweeps.
    ///
    /// Sweeps only start when called inside a tokio runtime.
    ///
    /// # Errors
    /// `CacheError::InvalidConfig` if any cache's configuration is invalid.
    pub fn new(config: ManagerConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Builds all four caches on a shared clock and starts their sweeps.
    pub fn with_clock(config: ManagerConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let manager = Self {
            general: Cache::with_clock(CacheKind::General.name(), config.general, clock.clone())?,
            media: MediaCache::with_clock(config.media, clock.clone())?,
            users: UserDataCache::with_clock(config.users, clock.clone())?,
            content: ContentCache::with_clock(config.content, clock)?,
        };

        let sweeping = CacheKind::ALL
            .iter()
            .filter(|kind| manager.cache(**kind).start_sweep())
            .count();
        info!(sweeping, "Cache manager initialized");

        Ok(manager)
    }

    // == Routing ==
    pub fn cache(&self, kind: CacheKind) -> &Cache<V> {
        match kind {
            CacheKind::General => &self.general,
            CacheKind::Media => self.media.cache(),
            CacheKind::Users => self.users.cache(),
            CacheKind::Content => self.content.cache(),
        }
    }

    /// Returns the named cache, or `general` for an unknown name.
    pub fn resolve(&self, name: &str) -> &Cache<V> {
        self.cache(CacheKind::from_name(name))
    }

    pub fn general(&self) -> &Cache<V> {
        &self.general
    }

    pub fn media(&self) -> &MediaCache<V> {
        &self.media
    }

    pub fn users(&self) -> &UserDataCache<V> {
        &self.users
    }

    pub fn content(&self) -> &ContentCache<V> {
        &self.content
    }

    // == Delegating Operations ==
    pub fn set(&self, name: &str, key: impl Into<String>, value: V, ttl_ms: Option<u64>) {
        self.resolve(name).set(key, value, ttl_ms);
    }

    pub fn get(&self, name: &str, key: &str) -> Option<V> {
        self.resolve(name).get(key)
    }

    pub fn has(&self, name: &str, key: &str) -> bool {
        self.resolve(name).has(key)
    }

    pub fn delete(&self, name: &str, key: &str) -> bool {
        self.resolve(name).delete(key)
    }

    pub fn clear(&self, name: &str) {
        self.resolve(name).clear();
    }

    /// Clears every cache and resets every cache's counters.
    pub fn clear_all(&self) {
        for kind in CacheKind::ALL {
            self.cache(kind).clear();
        }
    }

    // == Stats ==
    /// Stats of every cache, keyed by cache name.
    pub fn stats(&self) -> BTreeMap<&'static str, StatsSnapshot> {
        CacheKind::ALL
            .into_iter()
            .map(|kind| (kind.name(), self.cache(kind).stats()))
            .collect()
    }

    /// Stats of the named cache, or of `general` for an unknown name.
    pub fn stats_for(&self, name: &str) -> StatsSnapshot {
        self.resolve(name).stats()
    }

    // == Memoization ==
    /// Starts memoizing an async operation against the named cache.
    ///
    /// See [`crate::memoize`] for the caching and concurrency behavior.
    pub fn memoize<A>(
        &self,
        name: &str,
        key: impl Into<MemoKey<A>>,
        ttl_ms: Option<u64>,
    ) -> Memoizer<'_, V, A> {
        memoize(self.resolve(name), key, ttl_ms)
    }

    // == Shutdown ==
    /// Stops every background sweep. Safe to call more than once.
    pub fn shutdown(&self) {
        let stopped = CacheKind::ALL
            .iter()
            .filter(|kind| self.cache(**kind).stop_sweep())
            .count();
        if stopped > 0 {
            info!(stopped, "Cache manager shut down");
        }
    }
}
