//! Feed Cache demo
//!
//! Builds the cache manager from environment configuration, runs a small
//! memoized workload, reports stats and waits for a shutdown signal.

use std::time::Duration;

use serde_json::{json, Value};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use feed_cache::{CacheManager, ManagerConfig, MemoKey};

/// Main entry point for the Feed Cache demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache manager (starts the expiry sweeps)
/// 4. Run a memoized post fetch twice and log stats
/// 5. Stop the sweeps on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feed_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Feed Cache demo");

    let config = ManagerConfig::from_env();
    info!(?config, "Configuration loaded");

    let manager: CacheManager = CacheManager::new(config)?;

    let cached_fetch = manager
        .memoize(
            "content",
            MemoKey::derived(|id: &u64| format!("post:{id}")),
            None,
        )
        .wrap(fetch_post);

    for _ in 0..2 {
        let post = cached_fetch.call(1).await?;
        info!(%post, "Fetched post");
    }

    let stats = serde_json::to_string_pretty(&manager.stats())?;
    info!("Cache stats:\n{stats}");

    shutdown_signal().await;
    manager.shutdown();

    info!("Shutdown complete");
    Ok(())
}

/// Stands in for a document store read.
async fn fetch_post(id: u64) -> anyhow::Result<Value> {
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(json!({ "id": id, "title": "Neon skyline", "likes": 12 }))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
