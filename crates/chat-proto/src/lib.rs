//! # chat-proto
//!
//! Wire protocol for the chatd line-oriented chat service.
//!
//! ## Features
//!
//! - Pure command parsing from one received line into a typed [`Command`]
//! - The complete server reply vocabulary as a [`Reply`] enum
//! - Optional Tokio codec ([`LineCodec`]) framing newline-terminated lines
//!
//! ## Quick Start
//!
//! ```rust
//! use chat_proto::{Command, Reply};
//!
//! let cmd = Command::parse("/MSG bob hi there");
//! assert_eq!(
//!     cmd,
//!     Command::DirectMessage { target: "bob".into(), text: "hi there".into() }
//! );
//!
//! let reply = Reply::Registered("alice".into());
//! assert_eq!(reply.to_string(), "Registered nickname alice");
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;
pub mod reply;

pub use self::command::{Command, RESERVED_NAME};
pub use self::error::{ProtocolError, Result};
#[cfg(feature = "tokio")]
pub use self::line::{Line, LineCodec, DEFAULT_MAX_LINE_LEN};
pub use self::reply::Reply;
