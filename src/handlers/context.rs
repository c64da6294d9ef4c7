//! Command handler context.

use crate::error::{HandlerError, HandlerResult};
use crate::state::{Registry, Session};
use chat_proto::Reply;

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// The issuing session, owned by the calling connection task.
    pub session: &'a mut Session,
    /// Shared session registry.
    pub registry: &'a Registry,
}

impl<'a> Context<'a> {
    pub fn new(session: &'a mut Session, registry: &'a Registry) -> Self {
        Self { session, registry }
    }

    /// Send a reply to the issuing session.
    pub async fn reply(&self, reply: Reply) -> HandlerResult {
        self.session.handle().send(&reply).await
    }

    /// The caller's display name, or `NotRegistered`.
    pub fn registered_name(&self) -> Result<String, HandlerError> {
        match self.session.name() {
            Some(name) if self.session.is_registered() => Ok(name.to_string()),
            _ => Err(HandlerError::NotRegistered),
        }
    }
}
