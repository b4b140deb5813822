use std::future::Future;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::ToSocketAddrs;

use crate::metrics::ByteCounters;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to bind metrics listener: {0}")]
    Bind(#[source] std::io::Error),
    #[error("metrics server failed: {0}")]
    Serve(#[source] std::io::Error),
}

type Result<T> = std::result::Result<T, Error>;

async fn export_metrics(counters: State<ByteCounters>) -> Response {
    match counters.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, counters.content_type())],
            body,
        )
            .into_response(),
        Err(err) => {
            log::error!("Failed to render metrics: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to export metrics",
            )
                .into_response()
        }
    }
}

/// Serves the byte counters at `GET /metrics`.
pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new(counters: ByteCounters) -> Self {
        let router = axum::Router::new()
            .route("/metrics", get(export_metrics))
            .with_state(counters);
        Self { router }
    }

    pub fn router(&self) -> axum::Router {
        self.router.clone()
    }

    /// Binds `addr` and serves until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// - [`Error::Bind`] if the listener cannot be bound.
    /// - [`Error::Serve`] if serving fails.
    pub async fn listen(
        self,
        addr: impl ToSocketAddrs,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(Error::Bind)?;
        if let Ok(local_addr) = listener.local_addr() {
            log::info!("serving metrics on http://{}/metrics", local_addr);
        }
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(Error::Serve)
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("failed to listen for SIGTERM: {}", err);
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
    log::info!("shutdown requested");
}
