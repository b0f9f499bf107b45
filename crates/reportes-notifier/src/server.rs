// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTTP liveness endpoint.
//!
//! The only HTTP surface of the service: `GET /` answers with a fixed
//! confirmation string so uptime monitors can tell the process is alive.
//! Everything else the service does is driven by the schedulers.

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Body returned by the liveness route.
pub const LIVENESS_MESSAGE: &str = "El servicio de reportes vencidos está corriendo.";

/// Build the single-route router.
pub fn router() -> Router {
    Router::new().route("/", get(liveness))
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// Serve the router on an already-bound listener until the shutdown
/// channel flips.
pub async fn run_http_server(
    listener: TcpListener,
    mut shutdown: watch::Receiver<bool>,
) -> std::io::Result<()> {
    axum::serve(listener, router())
        .with_graceful_shutdown(async move {
            let _ = shutdown.changed().await;
        })
        .await
}
