//! NICK command handler.
//!
//! Registers or renames the calling session. The registry decides
//! uniqueness atomically; this handler only mirrors the result into the
//! session and tells everyone else.

use super::{Context, fan_out};
use crate::error::{HandlerError, HandlerResult};
use chat_proto::Reply;
use tracing::{debug, info};

pub(super) async fn handle_nick(ctx: &mut Context<'_>, name: String) -> HandlerResult {
    let id = ctx.session.id();

    if !ctx.registry.try_register(id, &name) {
        debug!(session = %id, name = %name, "Nickname rejected");
        return Err(HandlerError::NameTaken(name));
    }

    let notice = match ctx.session.set_name(name.clone()) {
        Some(old) => {
            info!(session = %id, old = %old, new = %name, "Session renamed");
            Reply::Renamed {
                old,
                new: name.clone(),
            }
        }
        None => {
            info!(session = %id, name = %name, addr = %ctx.session.addr(), "Session registered");
            Reply::Joined(name.clone())
        }
    };

    ctx.reply(Reply::Registered(name)).await?;
    fan_out(&ctx.registry.snapshot(), id, &notice);
    Ok(())
}
