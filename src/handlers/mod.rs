//! Command dispatch.
//!
//! Translates a parsed [`Command`] from one session into registry operations
//! and outbound lines. Handlers return [`HandlerError`] for every rejected
//! command; the connection loop turns that into the caller's reply.
//!
//! Only `/NICK` is accepted before a session registers. `/BC`, `/MSG` and
//! `/LIST` fail with [`HandlerError::NotRegistered`] until then.

mod chat;
mod context;
mod fanout;
mod list;
mod nick;
mod teardown;

pub use context::Context;
pub use fanout::fan_out;
pub use teardown::teardown;

use crate::error::{HandlerError, HandlerResult};
use crate::telemetry::CommandTimer;
use chat_proto::Command;

/// Run one command on behalf of `ctx.session`.
pub async fn dispatch(ctx: &mut Context<'_>, command: Command) -> HandlerResult {
    let _timer = CommandTimer::new(command.name());

    match command {
        Command::SetNickname(name) => nick::handle_nick(ctx, name).await,
        Command::Broadcast(text) => chat::handle_broadcast(ctx, text).await,
        Command::DirectMessage { target, text } => {
            chat::handle_direct_message(ctx, target, text).await
        }
        Command::ListNames => list::handle_list(ctx).await,
        Command::Malformed(raw) => Err(HandlerError::Malformed(raw)),
    }
}
