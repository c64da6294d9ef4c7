//! chatd - a line-oriented multi-user chat server.
//!
//! Clients connect over TCP, pick a nickname with `/NICK`, then broadcast with
//! `/BC`, message one user with `/MSG` and list users with `/LIST`.

mod config;
mod error;
mod handlers;
mod http;
mod metrics;
mod network;
mod state;
mod telemetry;

use crate::config::Config;
use crate::network::Gateway;
use crate::state::Registry;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(path = %config_path, error = %e, "Invalid config");
        }
        anyhow::bail!("{} configuration error(s) in {config_path}", errors.len());
    }

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        "Starting chatd"
    );

    // Metrics are optional; a missing or zero port disables the endpoint.
    metrics::init();
    match config.server.metrics_port() {
        Some(port) => {
            tokio::spawn(async move {
                http::run_http_server(port).await;
            });
            info!(port, "Prometheus HTTP server started");
        }
        None => info!("Metrics endpoint disabled"),
    }

    let registry = Arc::new(Registry::new());
    let gateway = Gateway::bind(&config.listen, config.limits.clone(), Arc::clone(&registry)).await?;

    tokio::select! {
        result = gateway.run() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!(
                sessions = registry.len(),
                registered = registry.registered_count(),
                "Shutdown requested - no longer accepting connections"
            );
        }
    }

    Ok(())
}

/// Human-readable logs by default; `CHATD_LOG_FORMAT=json` for JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match std::env::var("CHATD_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
