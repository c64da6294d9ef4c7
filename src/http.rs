//! `/metrics` endpoint.
//!
//! Exposes the chatd registry from [`crate::metrics`] in the Prometheus text
//! format: open and registered sessions, per-command counts, latency and
//! errors, and lines sent or dropped on outbound queues. Nothing else is
//! served. The endpoint is off unless `server.metrics_port` is set.

use axum::{Router, routing::get};
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tracing::{error, info};

fn router() -> Router {
    Router::new().route("/metrics", get(|| async { crate::metrics::gather_metrics() }))
}

/// Serve `/metrics` on `0.0.0.0:port` until the process exits.
///
/// A bind failure is logged and ends this task only; chat traffic is
/// unaffected.
pub async fn run_http_server(port: u16) {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Metrics endpoint unavailable");
            return;
        }
    };
    info!(%addr, "Serving /metrics");

    if let Err(e) = axum::serve(listener, router()).await {
        error!(error = %e, "Metrics endpoint stopped");
    }
}
