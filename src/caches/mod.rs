//! Specialized Caches
//!
//! Thin wrappers around [`Cache`](crate::cache::Cache) that fix the
//! defaults for one content domain and add key-namespacing helpers.

mod content;
mod media;
mod users;

pub use content::{
    post_key, search_key, ContentCache, POST_TTL_MS, SEARCH_TTL_MS, TRENDING_KEY, TRENDING_TTL_MS,
};
pub use media::MediaCache;
pub use users::{posts_key, profile_key, UserDataCache, POSTS_TTL_MS, PROFILE_TTL_MS};
