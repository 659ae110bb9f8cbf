//! Quote Keeper Server binary

use anyhow::{Context, Result};
use axum::extract::Request;
use axum::ServiceExt;
use quote_server::config::ServerConfig;
use quote_server::fetcher::QuotableFetcher;
use quote_server::services::QuoteService;
use quote_server::{routes, storage, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quote_server=info,tower_http=info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Quote Keeper server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, db={}",
        config.bind_address,
        config.database.describe()
    );

    let store = storage::connect(&config.database, config.max_connections).await?;
    info!("Using {} quote store", store.backend_name());

    let state = AppState {
        quotes: Arc::new(QuoteService::new(store.clone())),
        fetcher: Arc::new(QuotableFetcher::new(config.quotable_api_url.clone())),
    };
    let app = routes::app(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Server listening on {}", addr);

    let served = axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error");

    info!("Closing database connections...");
    store.close().await;
    info!("Server stopped");

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
