//! Per-connection session state.
//!
//! ```text
//! ┌──────────────┐  /NICK ok   ┌──────────────┐  EOF / read error  ┌────────┐
//! │ Unregistered ├────────────►│  Registered  ├───────────────────►│ Closed │
//! └──────┬───────┘             └──────┬───────┘                    └────────┘
//!        │                            │ /NICK ok (rename)              ▲
//!        │                            └────────┘                       │
//!        └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`Session`] is owned by its connection task. Other tasks only ever see
//! its [`SessionHandle`], which can enqueue outbound lines and nothing else.

use super::SessionId;
use crate::error::HandlerResult;
use chat_proto::Reply;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Unregistered,
    Registered,
    Closed,
}

/// Non-owning reference to a session: its id and outbound queue.
///
/// Cloned into the registry and into snapshots. All lines for one session
/// pass through its single queue, which is drained by one writer task, so
/// concurrent senders never interleave partial lines.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    id: SessionId,
    outbound: mpsc::Sender<Arc<str>>,
}

impl SessionHandle {
    pub fn new(id: SessionId, outbound: mpsc::Sender<Arc<str>>) -> Self {
        Self { id, outbound }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Enqueue a line for this session, waiting for queue space.
    ///
    /// Only the session's own task should wait on its queue.
    pub async fn send(&self, reply: &Reply) -> HandlerResult {
        self.outbound.send(Arc::from(reply.to_string())).await?;
        Ok(())
    }

    /// Enqueue a line without waiting. Used for writes to other sessions.
    ///
    /// A full queue drops the line for this recipient; a closed queue means
    /// the recipient is already tearing itself down. Neither is reported to
    /// the sender.
    pub fn deliver(&self, line: &Arc<str>) -> bool {
        match self.outbound.try_send(Arc::clone(line)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(session = %self.id, "Outbound queue full - line dropped");
                crate::metrics::record_dropped();
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!(session = %self.id, "Outbound queue closed - recipient disconnecting");
                false
            }
        }
    }
}

/// State for one client connection.
#[derive(Debug)]
pub struct Session {
    handle: SessionHandle,
    addr: SocketAddr,
    name: Option<String>,
    state: SessionState,
}

impl Session {
    pub fn new(handle: SessionHandle, addr: SocketAddr) -> Self {
        Self {
            handle,
            addr,
            name: None,
            state: SessionState::Unregistered,
        }
    }

    pub fn id(&self) -> SessionId {
        self.handle.id
    }

    pub fn handle(&self) -> &SessionHandle {
        &self.handle
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_registered(&self) -> bool {
        self.state == SessionState::Registered
    }

    /// Record a name the registry has accepted. Returns the previous name.
    pub fn set_name(&mut self, name: String) -> Option<String> {
        self.state = SessionState::Registered;
        self.name.replace(name)
    }

    /// Move to `Closed`. Returns `false` if the session was already closed.
    pub fn close(&mut self) -> bool {
        if self.state == SessionState::Closed {
            return false;
        }
        self.state = SessionState::Closed;
        true
    }
}
