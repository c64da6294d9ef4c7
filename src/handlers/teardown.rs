//! Session teardown.

use super::fan_out;
use crate::state::{Registry, Session};
use chat_proto::Reply;
use tracing::info;

/// Remove a session from the registry and tell the remaining users.
///
/// Runs at most once per session; later calls do nothing.
pub fn teardown(session: &mut Session, registry: &Registry) {
    if !session.close() {
        return;
    }

    let id = session.id();
    let name = registry.remove(id);
    if let Some(name) = &name {
        fan_out(&registry.snapshot(), id, &Reply::Left(name.clone()));
    }

    crate::metrics::session_closed();
    info!(session = %id, addr = %session.addr(), name = ?name, "Session closed");
}
