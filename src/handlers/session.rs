//! Session lifecycle handlers.
//!
//! Covers the /start, /stop and /next commands plus the gender and
//! begin-search callback selections.

use super::{Context, Handler, HandlerResult};
use crate::replies;
use crate::state::{Gender, Outbound, Prompt};
use async_trait::async_trait;

/// Handler for /start: show the welcome message with the gender keyboard.
///
/// Always allowed, never touches session state; the state only changes once
/// the user answers through a callback.
pub struct StartHandler;

#[async_trait]
impl Handler for StartHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _payload: &str) -> HandlerResult {
        ctx.outbox.push(Outbound::with_prompt(
            ctx.chat,
            replies::WELCOME,
            Prompt::ChooseGender,
        ));
        Ok(())
    }
}

/// Handler for the gender callback tokens.
pub struct GenderHandler(pub Gender);

#[async_trait]
impl Handler for GenderHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _payload: &str) -> HandlerResult {
        ctx.outbox.extend(ctx.engine.choose_gender(ctx.chat, self.0));
        Ok(())
    }
}

/// Handler for the begin-search callback token.
pub struct BeginHandler;

#[async_trait]
impl Handler for BeginHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _payload: &str) -> HandlerResult {
        ctx.outbox.extend(ctx.engine.start_search(ctx.chat)?);
        Ok(())
    }
}

/// Handler for /stop: end the current session.
pub struct StopHandler;

#[async_trait]
impl Handler for StopHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _payload: &str) -> HandlerResult {
        ctx.outbox.extend(ctx.engine.end_session(ctx.chat)?);
        Ok(())
    }
}

/// Handler for /next: leave the current session and search again.
pub struct NextHandler;

#[async_trait]
impl Handler for NextHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _payload: &str) -> HandlerResult {
        ctx.outbox.extend(ctx.engine.next_partner(ctx.chat)?);
        Ok(())
    }
}
