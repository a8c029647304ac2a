//! Product Cache - catalog API with a cache-aside query layer

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_cache::cache::{CacheBackend, CacheStore, MemoryBackend, RedisBackend};
use product_cache::catalog::{sample_products, InMemoryProductStore, ProductStore};
use product_cache::config::{CacheBackendKind, Config};
use product_cache::{create_router, spawn_cleanup_task, AppState};

/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache backend (and its sweep task for the memory backend)
/// 4. Build and optionally seed the product store
/// 5. Serve until SIGINT/SIGTERM, then release the cache connection
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Product Cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, port={}, op_timeout={}ms, ttl={}/{}/{}s",
        config.cache_backend,
        config.server_port,
        config.op_timeout_ms,
        config.ttl_volatile_secs,
        config.ttl_semistable_secs,
        config.ttl_curated_secs
    );

    let (backend, cleanup_handle): (Arc<dyn CacheBackend>, Option<JoinHandle<()>>) =
        match config.cache_backend {
            CacheBackendKind::Memory => {
                let memory = Arc::new(MemoryBackend::new(config.max_entries));
                let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
                let backend: Arc<dyn CacheBackend> = memory;
                (backend, Some(handle))
            }
            CacheBackendKind::Redis => {
                let redis = RedisBackend::new(config.redis_connection_info())
                    .context("invalid Redis connection settings")?
                    .with_round_trip_timeout(config.op_timeout());
                let backend: Arc<dyn CacheBackend> = Arc::new(redis);
                (backend, None)
            }
        };
    let cache_store = Arc::new(
        CacheStore::new(backend, config.op_timeout()).with_prefix_timeout(config.prefix_timeout()),
    );
    info!("Cache store initialized on {} backend", cache_store.backend_name());

    let products = Arc::new(InMemoryProductStore::new());
    if config.seed_catalog {
        for product in sample_products() {
            products
                .create(product)
                .await
                .context("failed to seed sample catalog")?;
        }
        info!("Seeded {} sample products", products.len().await);
    }

    let state = AppState::new(products, cache_store.clone(), config.ttl_policy());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    cache_store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM, then stops the sweep task.
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
        warn!("Cleanup task aborted");
    }
}
