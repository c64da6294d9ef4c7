//! Error types for the chat protocol library.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors surfaced by the line transport.
///
/// Oversized lines and invalid UTF-8 are not errors: the codec reports them
/// as [`crate::Line`] items so the session can reply and keep reading.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An I/O error occurred on the underlying stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
