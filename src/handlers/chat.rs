//! BC and MSG command handlers.

use super::{Context, fan_out};
use crate::error::{HandlerError, HandlerResult};
use chat_proto::Reply;
use std::sync::Arc;
use tracing::debug;

/// `/BC <text>`: echo to the caller, then deliver to every other
/// registered session.
pub(super) async fn handle_broadcast(ctx: &mut Context<'_>, text: String) -> HandlerResult {
    let from = ctx.registered_name()?;
    let line = Reply::chat(from, text);

    // Taken before the echo so the audience is fixed at the moment the
    // command is handled.
    let snapshot = ctx.registry.snapshot();

    ctx.reply(line.clone()).await?;
    let delivered = fan_out(&snapshot, ctx.session.id(), &line);
    crate::metrics::record_fanout(delivered);

    debug!(session = %ctx.session.id(), recipients = delivered, "Broadcast delivered");
    Ok(())
}

/// `/MSG <target> <text>`: deliver to one named session and acknowledge.
pub(super) async fn handle_direct_message(
    ctx: &mut Context<'_>,
    target: String,
    text: String,
) -> HandlerResult {
    let from = ctx.registered_name()?;

    if target == from {
        return Err(HandlerError::CannotMessageSelf);
    }

    let Some(recipient) = ctx.registry.lookup_by_name(&target) else {
        return Err(HandlerError::NoSuchUser(target));
    };

    let line: Arc<str> = Arc::from(Reply::chat(from.clone(), text.clone()).to_string());
    if recipient.deliver(&line) {
        crate::metrics::record_fanout(1);
    }

    ctx.reply(Reply::Delivered {
        from,
        to: target,
        text,
    })
    .await
}
