//! Client command parsing.
//!
//! Every received line maps to exactly one [`Command`]. Parsing is pure: no
//! I/O, no shared state, and it never fails. Anything that does not match a
//! known command with the right arity becomes [`Command::Malformed`], which
//! carries the original text so the server can echo it back.
//!
//! | Line                   | Command                          |
//! |------------------------|----------------------------------|
//! | `/NICK <name>`         | [`Command::SetNickname`]         |
//! | `/BC <text>`           | [`Command::Broadcast`]           |
//! | `/MSG <target> <text>` | [`Command::DirectMessage`]       |
//! | `/LIST`                | [`Command::ListNames`]           |
//! | anything else          | [`Command::Malformed`]           |

/// Sender name used for system-originated notices. Never assignable to a client.
pub const RESERVED_NAME: &str = "server";

/// A parsed client command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `/BC <text>`: send `text` to every other registered session.
    Broadcast(String),
    /// `/MSG <target> <text>`: send `text` to the session named `target`.
    DirectMessage {
        /// Display name of the recipient.
        target: String,
        /// Message body, verbatim including internal whitespace.
        text: String,
    },
    /// `/NICK <name>`: claim a display name.
    SetNickname(String),
    /// `/LIST`: list every registered display name.
    ListNames,
    /// Unknown command or wrong arity. Holds the raw line.
    Malformed(String),
}

impl Command {
    /// Parse one received line.
    ///
    /// The caller is expected to have trimmed surrounding whitespace already.
    pub fn parse(line: &str) -> Command {
        let (token, rest) = split_token(line);

        match token {
            "/NICK" => match rest.map(split_token) {
                Some((name, None)) => Command::SetNickname(name.to_string()),
                _ => Command::Malformed(line.to_string()),
            },
            "/BC" => match rest {
                Some(text) => Command::Broadcast(text.to_string()),
                None => Command::Malformed(line.to_string()),
            },
            "/MSG" => match rest.map(split_token) {
                Some((target, Some(text))) => Command::DirectMessage {
                    target: target.to_string(),
                    text: text.to_string(),
                },
                _ => Command::Malformed(line.to_string()),
            },
            "/LIST" if rest.is_none() => Command::ListNames,
            _ => Command::Malformed(line.to_string()),
        }
    }

    /// Static label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Broadcast(_) => "BC",
            Command::DirectMessage { .. } => "MSG",
            Command::SetNickname(_) => "NICK",
            Command::ListNames => "LIST",
            Command::Malformed(_) => "INVALID",
        }
    }
}

impl std::str::FromStr for Command {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Command::parse(s))
    }
}

/// Split off the first token at the first whitespace run.
///
/// The remainder has the separating run removed and is `None` when nothing
/// but whitespace follows the token.
fn split_token(s: &str) -> (&str, Option<&str>) {
    match s.find(char::is_whitespace) {
        Some(idx) => {
            let rest = s[idx..].trim_start();
            (&s[..idx], (!rest.is_empty()).then_some(rest))
        }
        None => (s, None),
    }
}
