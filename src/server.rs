use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::app::App;
use crate::config::ServiceConfig;
use crate::router::build_router;

/// Opens storage, builds the router and serves until Ctrl-C.
pub async fn run(config: ServiceConfig) -> Result<()> {
    let app = App::from_config(&config)
        .with_context(|| format!("failed to open database at {}", config.db_path.display()))?;
    tracing::info!(
        db_path = %config.db_path.display(),
        auth = config.api_token.is_some(),
        "storage ready"
    );
    serve(config.addr, build_router(Arc::new(app))).await
}

pub async fn serve(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
    }
}
