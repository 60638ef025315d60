//! Event handlers.
//!
//! Contains the Handler trait and the registry that routes inbound events -
//! reserved command tokens, callback selections, and free text - to the
//! matchmaking engine. Session errors surface here and are turned into their
//! corrective reply before anything reaches the transport.

mod relay;
mod session;

pub use relay::RelayHandler;
pub use session::{BeginHandler, GenderHandler, NextHandler, StartHandler, StopHandler};

use crate::error::SessionError;
use crate::state::{ChatId, Gender, Matchmaker, Outbound};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// One inbound event from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A plain text message. Reserved tokens are commands, the rest relays.
    Text { chat: ChatId, text: String },
    /// An inline-button selection.
    Callback { chat: ChatId, data: String },
}

impl Event {
    pub fn chat(&self) -> ChatId {
        match self {
            Self::Text { chat, .. } | Self::Callback { chat, .. } => *chat,
        }
    }
}

/// Handler context passed to each handler.
pub struct Context<'a> {
    /// The chat the event came from.
    pub chat: ChatId,
    /// The shared matchmaking engine.
    pub engine: &'a Matchmaker,
    /// Notifications to deliver once dispatch returns.
    pub outbox: &'a mut Vec<Outbound>,
}

/// Result type for handlers.
pub type HandlerResult = Result<(), SessionError>;

/// Trait implemented by all event handlers.
///
/// `payload` is the full text for the relay path and the raw token for
/// commands and callbacks.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context<'_>, payload: &str) -> HandlerResult;
}

/// Registry of command and callback handlers.
pub struct Registry {
    commands: HashMap<&'static str, Box<dyn Handler>>,
    callbacks: HashMap<&'static str, Box<dyn Handler>>,
    /// Fallback for non-command text.
    relay: Box<dyn Handler>,
}

impl Registry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut commands: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();
        commands.insert("/start", Box::new(StartHandler));
        commands.insert("/stop", Box::new(StopHandler));
        commands.insert("/next", Box::new(NextHandler));

        let mut callbacks: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();
        callbacks.insert("gender_male", Box::new(GenderHandler(Gender::Male)));
        callbacks.insert("gender_female", Box::new(GenderHandler(Gender::Female)));
        callbacks.insert("start_chat", Box::new(BeginHandler));

        Self {
            commands,
            callbacks,
            relay: Box::new(RelayHandler),
        }
    }

    /// Route one event and return the notifications to deliver.
    ///
    /// The registry entry for the user is created before anything else, and
    /// every handler error becomes a corrective reply to the sender.
    pub async fn dispatch(&self, engine: &Matchmaker, event: &Event) -> Vec<Outbound> {
        let chat = event.chat();
        engine.touch(chat);

        let mut outbox = Vec::new();
        let mut ctx = Context {
            chat,
            engine,
            outbox: &mut outbox,
        };

        let (result, during_relay) = match event {
            Event::Text { text, .. } => match self.commands.get(text.as_str()) {
                Some(handler) => (handler.handle(&mut ctx, text).await, false),
                None => (self.relay.handle(&mut ctx, text).await, true),
            },
            Event::Callback { data, .. } => match self.callbacks.get(data.as_str()) {
                Some(handler) => (handler.handle(&mut ctx, data).await, false),
                None => {
                    debug!(chat, data = %data, "ignoring unknown callback token");
                    (Ok(()), false)
                }
            },
        };

        if let Err(err) = result {
            debug!(chat, code = err.error_code(), "operation rejected");
            outbox.push(Outbound::plain(chat, err.reply_text(during_relay)));
        }
        outbox
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replies;
    use crate::state::Prompt;

    fn text(chat: ChatId, text: &str) -> Event {
        Event::Text {
            chat,
            text: text.to_string(),
        }
    }

    fn callback(chat: ChatId, data: &str) -> Event {
        Event::Callback {
            chat,
            data: data.to_string(),
        }
    }

    #[tokio::test]
    async fn start_shows_welcome_with_gender_keyboard() {
        let engine = Matchmaker::new();
        let registry = Registry::new();

        let out = registry.dispatch(&engine, &text(1, "/start")).await;
        assert_eq!(
            out,
            vec![Outbound::with_prompt(1, replies::WELCOME, Prompt::ChooseGender)]
        );
    }

    #[tokio::test]
    async fn callback_tokens_drive_the_state_machine() {
        let engine = Matchmaker::new();
        let registry = Registry::new();

        let out = registry.dispatch(&engine, &callback(1, "gender_female")).await;
        assert_eq!(out[0].prompt, Some(Prompt::BeginSearch));

        let out = registry.dispatch(&engine, &callback(1, "start_chat")).await;
        assert_eq!(out, vec![Outbound::plain(1, replies::SEARCHING)]);
    }

    #[tokio::test]
    async fn unknown_callback_is_ignored() {
        let engine = Matchmaker::new();
        let registry = Registry::new();

        let out = registry.dispatch(&engine, &callback(1, "bogus")).await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn free_text_relays_between_partners() {
        let engine = Matchmaker::new();
        let registry = Registry::new();
        registry.dispatch(&engine, &callback(1, "gender_male")).await;
        registry.dispatch(&engine, &callback(2, "gender_female")).await;
        registry.dispatch(&engine, &callback(1, "start_chat")).await;
        registry.dispatch(&engine, &callback(2, "start_chat")).await;

        let out = registry.dispatch(&engine, &text(1, "привет")).await;
        assert_eq!(out, vec![Outbound::plain(2, "привет")]);
    }

    #[tokio::test]
    async fn errors_become_corrective_replies() {
        let engine = Matchmaker::new();
        let registry = Registry::new();

        let out = registry.dispatch(&engine, &callback(5, "start_chat")).await;
        assert_eq!(out, vec![Outbound::plain(5, replies::NO_GENDER)]);

        let out = registry.dispatch(&engine, &text(5, "/stop")).await;
        assert_eq!(out, vec![Outbound::plain(5, replies::NOT_IN_CHAT)]);

        let out = registry.dispatch(&engine, &text(5, "эй?")).await;
        assert_eq!(out, vec![Outbound::plain(5, replies::NOT_IN_CHAT_RELAY)]);
    }
}
