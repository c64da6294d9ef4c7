//! Server-to-client lines.
//!
//! [`Reply`] is the whole outbound vocabulary. `Display` renders the exact
//! wire text without a line terminator; the codec appends `\n`.

use std::fmt;

use crate::command::RESERVED_NAME;

/// A line sent from the server to a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Successful `/NICK`.
    Registered(String),
    /// `/NICK` with an empty, reserved or already assigned name.
    NameTaken,
    /// Messaging command issued before `/NICK` succeeded.
    RegisterFirst,
    /// `/MSG` addressed to the caller's own name.
    CannotMessageSelf,
    /// `/MSG` addressed to a name nobody holds.
    NoSuchUser,
    /// Unparseable line, echoed back.
    Invalid(String),
    /// A line longer than the configured limit was discarded.
    LineTooLong(usize),
    /// A chat line from a user or from the server.
    Chat {
        /// Display name of the sender.
        from: String,
        /// Message body.
        text: String,
    },
    /// Acknowledgment of a delivered direct message.
    Delivered {
        /// Display name of the sender.
        from: String,
        /// Display name of the recipient.
        to: String,
        /// Message body.
        text: String,
    },
    /// Response to `/LIST`.
    Names(Vec<String>),
    /// System notice: a session registered its first name.
    Joined(String),
    /// System notice: a registered session changed its name.
    Renamed {
        /// Previous display name.
        old: String,
        /// New display name.
        new: String,
    },
    /// System notice: a registered session disconnected.
    Left(String),
}

impl Reply {
    /// Build a chat line.
    pub fn chat(from: impl Into<String>, text: impl Into<String>) -> Self {
        Reply::Chat {
            from: from.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Registered(name) => write!(f, "Registered nickname {name}"),
            Reply::NameTaken => f.write_str("Name is taken!"),
            Reply::RegisterFirst => f.write_str("Register first!"),
            Reply::CannotMessageSelf => f.write_str("Cannot message yourself!"),
            Reply::NoSuchUser => f.write_str("no such user"),
            Reply::Invalid(raw) => write!(f, "Invalid command: {raw}"),
            Reply::LineTooLong(limit) => write!(f, "Line too long (limit {limit} bytes)"),
            Reply::Chat { from, text } => write!(f, "{from}: {text}"),
            Reply::Delivered { from, to, text } => write!(f, "{from} -> {to}: {text}"),
            Reply::Names(names) => f.write_str(&names.join(" ")),
            Reply::Joined(name) => write!(f, "{RESERVED_NAME}: {name} joined"),
            Reply::Renamed { old, new } => {
                write!(f, "{RESERVED_NAME}: {old} is now known as {new}")
            }
            Reply::Left(name) => write!(f, "{RESERVED_NAME}: {name} left"),
        }
    }
}
