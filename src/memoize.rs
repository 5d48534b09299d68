//! Memoization
//!
//! Wraps an async operation so repeated calls with an equivalent key are
//! served from a cache instead of running the operation again.
//!
//! Only successful results are cached. Concurrent calls that miss on the
//! same key are not deduplicated: each runs the operation, each caller gets
//! its own result, and whichever finishes last owns the cache slot.

use std::fmt;
use std::future::Future;

use tracing::debug;

use crate::cache::Cache;

// == Memo Key ==
/// How a memoized call derives its cache key from its arguments.
pub enum MemoKey<A> {
    /// Every call uses the same key
    Static(String),
    /// The key is computed from the call's arguments
    Derived(Box<dyn Fn(&A) -> String + Send + Sync>),
}

impl<A> MemoKey<A> {
    pub fn derived<F>(key_fn: F) -> Self
    where
        F: Fn(&A) -> String + Send + Sync + 'static,
    {
        Self::Derived(Box::new(key_fn))
    }

    /// Computes the cache key for one call.
    pub fn resolve(&self, args: &A) -> String {
        match self {
            Self::Static(key) => key.clone(),
            Self::Derived(key_fn) => key_fn(args),
        }
    }
}

impl<A> From<&str> for MemoKey<A> {
    fn from(key: &str) -> Self {
        Self::Static(key.to_string())
    }
}

impl<A> From<String> for MemoKey<A> {
    fn from(key: String) -> Self {
        Self::Static(key)
    }
}

impl<A> fmt::Debug for MemoKey<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(key) => f.debug_tuple("Static").field(key).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

// == Memoizer ==
/// Cache, key strategy and TTL waiting for an operation to wrap.
#[derive(Debug)]
pub struct Memoizer<'c, V, A> {
    cache: &'c Cache<V>,
    key: MemoKey<A>,
    ttl_ms: Option<u64>,
}

/// Starts memoizing against `cache`.
///
/// `ttl_ms` of `None` uses the cache's default TTL.
///
/// # Example
/// ```ignore
/// let fetch_post = memoize(&cache, MemoKey::derived(|id: &u64| format!("post:{id}")), None)
///     .wrap(|id| async move { db.load_post(id).await });
/// let post = fetch_post.call(7).await?;
/// ```
pub fn memoize<'c, V, A>(
    cache: &'c Cache<V>,
    key: impl Into<MemoKey<A>>,
    ttl_ms: Option<u64>,
) -> Memoizer<'c, V, A> {
    Memoizer {
        cache,
        key: key.into(),
        ttl_ms,
    }
}

impl<'c, V, A> Memoizer<'c, V, A> {
    /// Wraps `op`, producing the memoized operation.
    pub fn wrap<F>(self, op: F) -> Memoized<'c, V, A, F> {
        Memoized {
            cache: self.cache,
            key: self.key,
            ttl_ms: self.ttl_ms,
            op,
        }
    }
}

// == Memoized ==
/// An async operation whose successful results are cached.
pub struct Memoized<'c, V, A, F> {
    cache: &'c Cache<V>,
    key: MemoKey<A>,
    ttl_ms: Option<u64>,
    op: F,
}

impl<'c, V, A, F> Memoized<'c, V, A, F>
where
    V: Clone + Send + 'static,
{
    /// Returns the cached value for the call's key, or runs the operation.
    ///
    /// A successful result is cached before being returned. A failure is
    /// returned unchanged and leaves the cache untouched.
    pub async fn call<Fut, E>(&self, args: A) -> Result<V, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let key = self.key.resolve(&args);

        if let Some(value) = self.cache.get(&key) {
            debug!(cache = self.cache.name(), key = %key, "Memoized call served from cache");
            return Ok(value);
        }

        debug!(cache = self.cache.name(), key = %key, "Memoized call missed, running operation");
        let value = (self.op)(args).await?;
        self.cache.set(key, value.clone(), self.ttl_ms);
        Ok(value)
    }
}

impl<'c, V, A, F> fmt::Debug for Memoized<'c, V, A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("key", &self.key)
            .field("ttl_ms", &self.ttl_ms)
            .finish_non_exhaustive()
    }
}
