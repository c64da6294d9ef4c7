//! LIST command handler.

use super::Context;
use crate::error::HandlerResult;
use chat_proto::Reply;

/// `/LIST`: every registered name, in connection order.
pub(super) async fn handle_list(ctx: &mut Context<'_>) -> HandlerResult {
    ctx.registered_name()?;

    let names = ctx
        .registry
        .snapshot()
        .into_iter()
        .map(|(_, name)| name)
        .collect();

    ctx.reply(Reply::Names(names)).await
}
