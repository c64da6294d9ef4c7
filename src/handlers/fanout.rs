//! Fan-out of one line to many sessions.

use crate::state::{SessionId, Snapshot};
use chat_proto::Reply;
use std::sync::Arc;

/// Deliver `reply` to every session in `snapshot` except `exclude`.
///
/// Delivery never waits on a recipient: a full or closed queue skips that
/// recipient only. Returns how many sessions accepted the line.
pub fn fan_out(snapshot: &Snapshot, exclude: SessionId, reply: &Reply) -> usize {
    let line: Arc<str> = Arc::from(reply.to_string());

    snapshot
        .iter()
        .filter(|(handle, _)| handle.id() != exclude)
        .filter(|(handle, _)| handle.deliver(&line))
        .count()
}
