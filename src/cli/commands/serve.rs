use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tower_sessions::ExpiredDeletion;
use tracing::{error, info};

use crate::api;
use crate::config::Config;

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub async fn cmd_serve(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "Feedback Portal v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;
    let session_store = api::session_store(&state).await?;

    let cleanup_store = session_store.clone();
    let cleanup_handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            if let Err(e) = cleanup_store.delete_expired().await {
                error!("Failed to delete expired sessions: {}", e);
            }
        }
    });

    let app = api::router(state, session_store);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup_handle.abort();
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
