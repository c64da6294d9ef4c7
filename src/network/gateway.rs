//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listen socket and spawns a Connection task for each
//! incoming client.

use crate::config::{LimitsConfig, ListenConfig};
use crate::network::Connection;
use crate::state::{Registry, SessionIdGenerator};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

/// Pause after a failed accept, so a persistent error (e.g. fd exhaustion)
/// does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    registry: Arc<Registry>,
    ids: SessionIdGenerator,
    limits: LimitsConfig,
}

impl Gateway {
    /// Bind the gateway to the configured address.
    pub async fn bind(
        listen: &ListenConfig,
        limits: LimitsConfig,
        registry: Arc<Registry>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(listen.address).await?;
        info!(address = %listener.local_addr()?, "Listener bound");

        Ok(Self {
            listener,
            registry,
            ids: SessionIdGenerator::new(),
            limits,
        })
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(%addr, error = %e, "Failed to set TCP_NODELAY");
                    }

                    let id = self.ids.next();
                    info!(session = %id, %addr, "Connection accepted");

                    let connection = Connection::new(
                        id,
                        stream,
                        addr,
                        Arc::clone(&self.registry),
                        self.limits.clone(),
                    );
                    tokio::spawn(async move {
                        if let Err(e) = connection.run().await {
                            warn!(session = %id, %addr, error = %e, "Connection error");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    crate::metrics::record_accept_error();
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }
    }
}
