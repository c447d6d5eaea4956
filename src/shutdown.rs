use std::sync::Arc;

use tokio::signal;

use crate::config::{AppConfig, ConfigHandle};

/// Wait for a shutdown signal (SIGINT or SIGTERM).
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown...");
        }
    }
}

/// Reload the configuration file on every SIGHUP.
///
/// A reload that fails to parse or validate is logged and the active
/// configuration stays in place.
#[cfg(unix)]
pub async fn reload_on_hangup(config: Arc<ConfigHandle>, config_path: Option<String>) {
    let mut hangup = match signal::unix::signal(signal::unix::SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGHUP handler, reload disabled");
            return;
        }
    };

    while hangup.recv().await.is_some() {
        tracing::info!("Received SIGHUP, reloading configuration");
        let result = match AppConfig::load(config_path.as_deref()) {
            Ok(next) => config.replace(next).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => tracing::info!("Configuration reloaded"),
            Err(e) => tracing::error!(error = %e, "Configuration reload rejected"),
        }
    }
}

#[cfg(not(unix))]
pub async fn reload_on_hangup(_config: Arc<ConfigHandle>, _config_path: Option<String>) {
    std::future::pending::<()>().await
}
