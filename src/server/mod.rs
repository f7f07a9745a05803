//! HTTP service layer
//!
//! # Modules
//!
//! - [`auth`]: Bearer-token middleware
//! - [`routes`]: Axum router and handlers
//! - [`scheduler`]: Daily refresh at midnight UTC
//! - [`state`]: Shared handler state

pub mod auth;
pub mod routes;
pub mod scheduler;
pub mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::{CacheBackend, CacheConfig, ProxyConfig};
use crate::server::state::AppState;
use crate::version::cache::{CacheStore, MemoryCache, SqliteCache};
use crate::version::catalog::{RefreshSummary, SourceCatalog};

fn open_sqlite(path: &Path) -> anyhow::Result<SqliteCache> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(SqliteCache::new(path)?)
}

/// Opens the configured cache, falling back to memory if SQLite is unusable
pub fn open_cache(config: &CacheConfig) -> Arc<dyn CacheStore> {
    match config.backend {
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        CacheBackend::Sqlite => {
            let path = config.db_path();
            match open_sqlite(&path) {
                Ok(cache) => Arc::new(cache),
                Err(e) => {
                    error!(
                        "Failed to open cache at {}: {:#}; using in-memory cache",
                        path.display(),
                        e
                    );
                    Arc::new(MemoryCache::new())
                }
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Serves the API until Ctrl-C
pub async fn run_server(config: ProxyConfig) -> anyhow::Result<()> {
    let cache = open_cache(&config.cache);
    let catalog = Arc::new(SourceCatalog::default());
    let state = AppState::new(cache.clone(), catalog.clone(), config.auth_token.clone());
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    if config.refresh.on_startup {
        let cache = cache.clone();
        let catalog = catalog.clone();
        tokio::spawn(async move {
            info!("Warming up cache");
            catalog.refresh_all(cache.as_ref()).await;
        });
    }

    if config.refresh.scheduled {
        tokio::spawn(scheduler::run_daily(cache, catalog));
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    Ok(())
}

/// Refreshes every source once into the configured cache
pub async fn run_refresh(config: &ProxyConfig) -> anyhow::Result<Vec<RefreshSummary>> {
    let cache = open_cache(&config.cache);
    let catalog = SourceCatalog::default();
    Ok(scheduler::run_scheduled_refresh(cache.as_ref(), &catalog).await)
}
