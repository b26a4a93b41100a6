mod app;
mod archive;
mod auth;
mod config;
mod error;
mod routes;
mod services;
mod settings_store;
mod state;
mod storage;

use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;
use crate::storage::FsStore;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = config::data_dir();
    let store = match FsStore::open(&data_dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!(error = %e, data_dir, "failed to open document store");
            return;
        }
    };
    tracing::info!(data_dir, "Document store ready");

    let state = AppState::new(store);
    if state.upstream.api_key.is_none() {
        tracing::warn!("RANKINGS_API_KEY is not set; leaderboard reads will fail until it is");
    }
    if state.admin.is_none() {
        tracing::warn!("ADMIN_USER is not set; privileged writes are disabled");
    }

    tokio::spawn(services::countdown_watcher::run(state.clone()));

    let app = app::build_app(state);

    let addr = format!("0.0.0.0:{}", config::server_port());
    tracing::info!("Wagerboard server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("Server shut down gracefully");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
