//! Shared Cache Handle
//!
//! A named `CacheStore` behind a mutex, plus the background sweep that
//! belongs to it. This is the type the specialized caches and the manager
//! compose.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheEntry, CacheStore, Clock, StatsSnapshot, SystemClock};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::spawn_sweep_task;

/// Named, lock-guarded cache that owns its expiry sweep.
///
/// The store lock is only ever held for the duration of one synchronous
/// operation, never across an `.await`.
#[derive(Debug)]
pub struct Cache<V> {
    name: String,
    store: Arc<Mutex<CacheStore<V>>>,
    sweep_interval: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<V> Cache<V>
where
    V: Clone + Send + 'static,
{
    /// Creates a cache that reads the wall clock. The sweep is not started.
    ///
    /// # Errors
    /// `CacheError::InvalidConfig` if any value in `config` is 0.
    pub fn new(name: impl Into<String>, config: CacheConfig) -> Result<Self> {
        Self::with_clock(name, config, Arc::new(SystemClock))
    }

    /// Creates a cache that reads time from `clock`. The sweep is not started.
    pub fn with_clock(
        name: impl Into<String>,
        config: CacheConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let store = CacheStore::from_config(&config, clock)?;
        Ok(Self {
            name: name.into(),
            store: Arc::new(Mutex::new(store)),
            sweep_interval: Duration::from_millis(config.sweep_interval_ms),
            sweeper: Mutex::new(None),
        })
    }

    // == Sweep Lifecycle ==
    /// Starts the background expiry sweep.
    ///
    /// Returns `true` if a sweep is running afterwards. Without an active
    /// tokio runtime nothing is spawned and `false` is returned.
    pub fn start_sweep(&self) -> bool {
        let mut sweeper = self.sweeper.lock();
        if sweeper.is_some() {
            return true;
        }

        if Handle::try_current().is_err() {
            warn!(cache = %self.name, "No tokio runtime active, expiry sweep not started");
            return false;
        }

        *sweeper = Some(spawn_sweep_task(
            self.store.clone(),
            self.name.clone(),
            self.sweep_interval,
        ));
        true
    }

    /// Stops the background sweep. Safe to call any number of times.
    ///
    /// Returns whether a running sweep was stopped.
    pub fn stop_sweep(&self) -> bool {
        match self.sweeper.lock().take() {
            Some(handle) => {
                handle.abort();
                info!(cache = %self.name, "Expiry sweep stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper.lock().is_some()
    }

    // == Operations ==
    /// See [`CacheStore::set`].
    pub fn set(&self, key: impl Into<String>, value: V, ttl_ms: Option<u64>) {
        self.store.lock().set(key, value, ttl_ms);
    }

    /// See [`CacheStore::get`].
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.lock().get(key)
    }

    /// See [`CacheStore::has`].
    pub fn has(&self, key: &str) -> bool {
        self.store.lock().has(key)
    }

    /// See [`CacheStore::delete`].
    pub fn delete(&self, key: &str) -> bool {
        self.store.lock().delete(key)
    }

    /// See [`CacheStore::clear`].
    pub fn clear(&self) {
        self.store.lock().clear();
    }

    /// Runs one sweep pass immediately.
    pub fn sweep_expired(&self) -> usize {
        self.store.lock().sweep_expired()
    }

    /// Copy of an entry including its metadata, with no side effects.
    pub fn peek(&self, key: &str) -> Option<CacheEntry<V>> {
        self.store.lock().peek(key).cloned()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.store.lock().stats()
    }

    pub fn keys(&self) -> Vec<String> {
        self.store.lock().keys()
    }

    pub fn values(&self) -> Vec<V> {
        self.store.lock().values()
    }

    pub fn entries(&self) -> Vec<(String, V)> {
        self.store.lock().entries()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.store.lock().capacity()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.abort();
        }
    }
}
