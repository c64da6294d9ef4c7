//! Unified error handling for chatd.
//!
//! Command handlers return [`HandlerError`]; the connection loop turns each
//! error into the client-visible [`Reply`] and a metrics label. Only
//! [`HandlerError::Send`] ends the session.

use chat_proto::Reply;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not registered")]
    NotRegistered,

    #[error("name is taken: {0}")]
    NameTaken(String),

    #[error("cannot message yourself")]
    CannotMessageSelf,

    #[error("no such user: {0}")]
    NoSuchUser(String),

    #[error("malformed command: {0:?}")]
    Malformed(String),

    /// The session's own outbound queue is closed; its writer has exited.
    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Arc<str>>),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotRegistered => "not_registered",
            Self::NameTaken(_) => "name_taken",
            Self::CannotMessageSelf => "cannot_message_self",
            Self::NoSuchUser(_) => "no_such_user",
            Self::Malformed(_) => "malformed",
            Self::Send(_) => "send_error",
        }
    }

    /// Convert to the reply sent back to the caller.
    ///
    /// Returns `None` for errors that don't warrant a client-visible reply.
    pub fn to_reply(&self) -> Option<Reply> {
        match self {
            Self::NotRegistered => Some(Reply::RegisterFirst),
            Self::NameTaken(_) => Some(Reply::NameTaken),
            Self::CannotMessageSelf => Some(Reply::CannotMessageSelf),
            Self::NoSuchUser(_) => Some(Reply::NoSuchUser),
            Self::Malformed(raw) => Some(Reply::Invalid(raw.clone())),
            Self::Send(_) => None,
        }
    }

    /// Whether the session must be torn down after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Send(_))
    }
}

/// Result type for command handlers.
pub type HandlerResult = Result<(), HandlerError>;
