use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use userbook_api::app::{AppServices, build_app};
use userbook_api::config::ApiConfig;
use userbook_core::DefaultClock;
use userbook_infra::{PostgresUserStore, db};
use userbook_observability::TracingAccessLog;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    userbook_observability::init();

    if let Err(e) = run().await {
        tracing::error!(error = ?e, "fatal error; shutting down");
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("failed to load configuration")?;

    let pool = db::connect(&config.database_url, config.db_max_connections)
        .await
        .context("failed to connect to database")?;
    db::ensure_schema(&pool)
        .await
        .context("failed to prepare database schema")?;

    let services = AppServices::new(
        Arc::new(PostgresUserStore::new(pool.clone())),
        Arc::new(DefaultClock),
        config.request_timeout,
    );
    let app = build_app(services, Arc::new(TracingAccessLog));

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;

    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.request_timeout.as_secs(),
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
