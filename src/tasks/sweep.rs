//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// Each pass takes the store lock, removes everything expired and releases
/// the lock before sleeping again, so a pass is never observed half done.
/// Aborting the returned handle cancels future passes.
///
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::<String>::new(100, 300_000)?));
/// let handle = spawn_sweep_task(store.clone(), "general".to_string(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<V>(
    store: Arc<Mutex<CacheStore<V>>>,
    name: String,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            cache = %name,
            interval_ms = interval.as_millis() as u64,
            "Starting expiry sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.lock().sweep_expired();

            if removed > 0 {
                info!(cache = %name, removed, "Expiry sweep removed entries");
            } else {
                debug!(cache = %name, "Expiry sweep found no expired entries");
            }
        }
    })
}
