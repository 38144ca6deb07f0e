//! Cache Proxy - A write-through caching proxy in front of Redis
//!
//! Serves repeated reads from a bounded local cache with TTL expiration and
//! LRU eviction, and commits every write to the backing store before caching it.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cache_proxy::api::create_router;
use cache_proxy::store::RedisStore;
use cache_proxy::{AppState, BoundedCache, Config};

/// Main entry point for the caching proxy.
///
/// # Startup Sequence
/// 1. Load configuration from environment variables
/// 2. Initialize tracing, to `LOG_FILE` when set
/// 3. Validate configuration
/// 4. Build the Redis client and ping it (failure is logged, not fatal)
/// 5. Build the single shared cache and the router
/// 6. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing(config.log_file.as_deref())?;

    info!("Starting cache proxy");
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: capacity={}, ttl={}s, backing_store={}, max_concurrent_requests={}",
        config.capacity,
        config.ttl_seconds,
        config.redis_url(),
        config.max_concurrent_requests
    );

    let store = RedisStore::from_config(&config).context("failed to set up Redis client")?;
    let cache = Arc::new(BoundedCache::from_config(&config, Arc::new(store)));
    cache.ping_store().await;

    let app = create_router(AppState::new(cache), config.max_concurrent_requests);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Sets up the tracing subscriber.
///
/// Defaults to "info" level, can be overridden with RUST_LOG env var.
fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cache_proxy=info,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(file)),
                )
                .init();
        }
        None => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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
