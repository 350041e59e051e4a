//! TTL Cache - an in-process key-value cache with time-based expiry
//!
//! Binary entry point: wires the store, the cleanup task and both transports.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{
    api::create_router, spawn_cleanup_task, AppState, CacheStore, Config, IpcServer,
};

/// Main entry point for the cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache store
/// 4. Start background TTL cleanup task
/// 5. Start the IPC server
/// 6. Start HTTP server on configured port
/// 7. On SIGINT/SIGTERM, stop HTTP, then cancel and await background tasks
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TTL cache server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: http_port={}, ipc_addr={}, cleanup_interval={}s, auth={}",
        config.server_port,
        config.ipc_addr,
        config.cleanup_interval,
        if config.api_key.is_some() { "api-key" } else { "off" }
    );

    let cache = Arc::new(CacheStore::new());
    let state = AppState::from_config(cache.clone(), &config);
    let shutdown = CancellationToken::new();

    let cleanup_handle =
        spawn_cleanup_task(cache.clone(), config.cleanup_schedule(), shutdown.child_token());
    info!("Background cleanup task started");

    let ipc = IpcServer::bind(config.ipc_addr, state.dispatcher.clone())
        .await
        .with_context(|| format!("failed to bind IPC server on {}", config.ipc_addr))?;
    let ipc_handle = ipc.spawn(shutdown.child_token());

    let app = create_router(state);
    let addr = config.http_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind HTTP server on {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .context("HTTP server error")?;

    shutdown.cancel();
    if let Err(e) = cleanup_handle.await {
        warn!("Cleanup task ended abnormally: {}", e);
    }
    if let Err(e) = ipc_handle.await {
        warn!("IPC server ended abnormally: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), or for `shutdown` to be
/// cancelled elsewhere.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
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
        _ = shutdown.cancelled() => {}
    }

    shutdown.cancel();
}
