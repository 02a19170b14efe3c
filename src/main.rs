//! Tenant Sessions - Opaque bearer-token session store
//!
//! Serves session introspection and logout on top of a shared cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tenant_sessions::api::create_router;
use tenant_sessions::cache::MEMORY_SCHEME;
use tenant_sessions::{
    spawn_cleanup_task, AppState, CacheClient, Config, MemoryCache, RedisCache, SessionSettings,
};

/// Main entry point for the session service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the shared cache client (Redis pool, or in-process map + sweep)
/// 4. Create the session store and router
/// 5. Serve until SIGINT/SIGTERM, then drain the cache pool
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tenant_sessions=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tenant session service");

    let config = Config::from_env().context("loading configuration")?;
    info!(
        "Configuration loaded: session_ttl={}s, pool_size={}, cache_timeout={}ms, port={}",
        config.session_ttl, config.cache_pool_size, config.cache_timeout_ms, config.server_port
    );

    let (cache, cleanup_handle) = connect_cache(&config)?;
    if let Err(err) = cache.ping().await {
        // Keep serving: lookups fail closed until the cache comes back
        warn!("Cache not reachable at startup: {}", err);
    }

    let state = AppState::new(cache.clone(), SessionSettings::from(&config));
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await;

    // Drain the pool even when serving failed
    cache.shutdown().await;
    served.context("serving HTTP")?;
    info!("Server shutdown complete");
    Ok(())
}

/// Builds the cache client selected by `CACHE_URL`.
///
/// `memory://` keeps sessions in this process only and starts the sweep task.
fn connect_cache(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CacheClient>, Option<JoinHandle<()>>)> {
    if config.cache_url.starts_with(MEMORY_SCHEME) {
        warn!("Using in-process session cache; sessions are not shared between processes");
        let memory = MemoryCache::new();
        let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
        return Ok((Arc::new(memory), Some(handle)));
    }

    let redis = RedisCache::from_config(config).context("building cache pool")?;
    Ok((Arc::new(redis), None))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
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
                warn!("Failed to install SIGTERM handler: {}", err);
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Session sweep task aborted");
    }
}
