//! TransQuest Server - demo page and HTTP API for translation quality estimation

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod error;
mod state;
#[cfg(test)]
mod testing;

use state::AppState;
use transquest_core::model::GoogleDriveFetcher;
use transquest_core::{EngineConfig, QualityService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "transquest_server=debug,transquest_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TransQuest Server");

    // Load configuration
    let config = EngineConfig::from_env()?;
    info!("Model cache directory: {:?}", config.cache_dir);
    info!(
        "Enabled directions: {}",
        config
            .directions
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    // The blocking HTTP client and model loading must stay off the runtime
    let service = tokio::task::spawn_blocking(move || {
        let fetcher = GoogleDriveFetcher::new()?.quiet();
        QualityService::from_config(config, fetcher)
    })
    .await??;
    let state = AppState::new(service);
    let service = state.service.clone();

    info!("Models loaded");

    // Build router
    let app = api::create_router(state.clone());

    // Start server
    let host = std::env::var("TRANSQUEST_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("TRANSQUEST_PORT") {
        Ok(raw) => match raw.parse::<u16>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid TRANSQUEST_PORT='{}', falling back to 8501", raw);
                8501
            }
        },
        Err(_) => 8501,
    };
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal(state));

    info!("Server ready. Press Ctrl+C to stop.");
    server.await?;

    // Last handle to the service, dropped on the blocking pool with it
    tokio::task::spawn_blocking(move || service.shutdown()).await?;
    info!("Inference daemon stopped");

    Ok(())
}

/// Wait for shutdown signal and cleanup
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
            info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
    }
    drop(state);
}
