//! HTTP host for the echo handler.
//!
//! Builds the routing table, wraps it in request tracing and serves it with
//! axum. All request handling is delegated to `echo-core`.

pub mod config;
pub mod routes;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use config::{Config, ConfigError};
pub use routes::{RouteError, RouteMatch, RouteTable};

/// Router with the echo route at `/echo`.
pub fn app() -> axum::Router {
    RouteTable::echo("").into_router()
}

/// Router for a resolved configuration, with per-request tracing.
pub fn app_with_config(config: &Config) -> axum::Router {
    let table = RouteTable::echo(&config.route_prefix);
    for route in table.routes() {
        info!(path = %route.path, methods = ?route.methods, "registered route");
    }
    table.into_router().layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve until Ctrl-C (or SIGTERM on Unix), letting in-flight requests finish.
pub async fn serve(listener: TcpListener, config: &Config) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_config(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
