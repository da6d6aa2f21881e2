//! HTTP server startup.
//!
//! [`serve_http`] opens the configured store, builds the router, and serves
//! until ctrl-c.

use anyhow::{Context, Result};

use crate::api::{self, AppState};
use crate::config::TreeConfig;
use crate::store;

/// Start the REST API on the configured address.
pub async fn serve_http(config: TreeConfig) -> Result<()> {
    let bind_addr = config.bind_addr();

    let store = store::create_store(&config.storage)?;
    tracing::info!(
        backend = %config.storage.backend,
        data_dir = %config.resolved_data_dir().display(),
        "store ready"
    );

    let router = api::router(AppState::new(store), config.server.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "family tree API listening at http://{bind_addr}/api");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down HTTP server");
}
