//! Waitline Server: virtual waiting room admission service.
//!
//! Wires store, notifier, and services together and runs the admission
//! scheduler until shutdown.

use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use waitline_core::config::{AppConfig, LogFormat};
use waitline_core::error::AppError;
use waitline_core::traits::store::QueueStore;
use waitline_worker::WaitlineRuntime;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("WAITLINE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Waitline");

    let runtime = WaitlineRuntime::build(&config).await?;
    if !runtime.store.health_check().await? {
        return Err(AppError::service_unavailable("Store health check failed"));
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = runtime.scheduler.clone();
    let scheduler_handle = tokio::spawn(async move {
        scheduler.run(shutdown_rx).await;
    });

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping scheduler");
    let _ = shutdown_tx.send(true);

    // An in-flight tick is allowed to finish its store writes.
    if tokio::time::timeout(Duration::from_secs(30), scheduler_handle)
        .await
        .is_err()
    {
        tracing::warn!("Scheduler did not stop within 30s");
    }

    tracing::info!("Waitline shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
