use std::sync::Arc;

use anyhow::Context;

use lockera_api::app::{self, services};
use lockera_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    lockera_observability::init("lockera-api");

    let config = AppConfig::from_env().context("invalid configuration")?;
    let store = services::open_store(&config.store).context("failed to open credential store")?;
    let (services, outbox) = services::build_services(&config, store);

    let seeded = services
        .accounts
        .seed_serials(&config.seed_serials)
        .context("failed to seed serials")?;
    if seeded > 0 {
        tracing::info!(seeded, "serials seeded from configuration");
    }

    let app = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // The router (and every outbox sender) is gone; drain what is queued.
    outbox.join().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
