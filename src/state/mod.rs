//! State management module.
//!
//! Contains the session [`Registry`] (the only state shared between
//! connections) and the per-connection [`Session`].

mod id;
mod registry;
mod session;

pub use id::{SessionId, SessionIdGenerator};
pub use registry::{Registry, Snapshot};
pub use session::{Session, SessionHandle};
#[cfg(test)]
pub use session::SessionState;
