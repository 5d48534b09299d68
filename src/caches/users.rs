//! User Data Cache
//!
//! User profiles under `user:<id>` and per-user post lists under `posts:<id>`.

use std::fmt::Display;
use std::sync::Arc;

use crate::cache::{Cache, Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;

/// TTL for cached user profiles (30 minutes).
pub const PROFILE_TTL_MS: u64 = 30 * 60_000;

/// TTL for cached per-user post lists (15 minutes).
pub const POSTS_TTL_MS: u64 = 15 * 60_000;

pub fn profile_key(user_id: impl Display) -> String {
    format!("user:{user_id}")
}

pub fn posts_key(user_id: impl Display) -> String {
    format!("posts:{user_id}")
}

/// Cache of user profiles and user post lists.
#[derive(Debug)]
pub struct UserDataCache<V> {
    cache: Cache<V>,
}

impl<V> UserDataCache<V>
where
    V: Clone + Send + 'static,
{
    pub const NAME: &'static str = "users";

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

    pub fn get_profile(&self, user_id: impl Display) -> Option<V> {
        self.cache.get(&profile_key(user_id))
    }

    pub fn set_profile(&self, user_id: impl Display, profile: V) {
        self.cache.set(profile_key(user_id), profile, Some(PROFILE_TTL_MS));
    }

    pub fn get_posts(&self, user_id: impl Display) -> Option<V> {
        self.cache.get(&posts_key(user_id))
    }

    pub fn set_posts(&self, user_id: impl Display, posts: V) {
        self.cache.set(posts_key(user_id), posts, Some(POSTS_TTL_MS));
    }

    /// Drops both the profile and the post list of a user.
    ///
    /// Returns whether anything was removed.
    pub fn invalidate_user(&self, user_id: impl Display) -> bool {
        let profile = self.cache.delete(&profile_key(&user_id));
        let posts = self.cache.delete(&posts_key(&user_id));
        profile || posts
    }
}
