//! Relay handler.
//!
//! Any text that is not a reserved command token is forwarded verbatim to
//! the sender's partner. This is the steady-state conversation path.

use super::{Context, Handler, HandlerResult};
use async_trait::async_trait;

pub struct RelayHandler;

#[async_trait]
impl Handler for RelayHandler {
    async fn handle(&self, ctx: &mut Context<'_>, payload: &str) -> HandlerResult {
        ctx.outbox.extend(ctx.engine.relay(ctx.chat, payload)?);
        Ok(())
    }
}
