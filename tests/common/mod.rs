//! Integration test common infrastructure.
//!
//! Drives the matchmaking engine through the same dispatch path the Telegram
//! gateway uses, without the network: events go in, outbound notifications
//! come out.

use iskrad::handlers::{Event, Registry};
use iskrad::state::{ChatId, Matchmaker, Outbound};

/// An in-process bot: engine plus handler registry.
pub struct TestBot {
    pub engine: Matchmaker,
    registry: Registry,
}

#[allow(dead_code)] // not every suite touches every helper
impl TestBot {
    pub fn new() -> Self {
        Self {
            engine: Matchmaker::new(),
            registry: Registry::new(),
        }
    }

    /// Deliver a text message (command or relay) from a user.
    pub async fn text(&self, chat: ChatId, text: &str) -> Vec<Outbound> {
        self.registry
            .dispatch(
                &self.engine,
                &Event::Text {
                    chat,
                    text: text.to_string(),
                },
            )
            .await
    }

    /// Deliver an inline-button selection from a user.
    pub async fn callback(&self, chat: ChatId, data: &str) -> Vec<Outbound> {
        self.registry
            .dispatch(
                &self.engine,
                &Event::Callback {
                    chat,
                    data: data.to_string(),
                },
            )
            .await
    }

    /// Walk a user through gender choice and search start.
    pub async fn join_queue(&self, chat: ChatId, gender_token: &str) -> Vec<Outbound> {
        self.callback(chat, gender_token).await;
        self.callback(chat, "start_chat").await
    }
}

/// The texts sent to one chat, in order.
pub fn texts_for(outbox: &[Outbound], chat: ChatId) -> Vec<&str> {
    outbox
        .iter()
        .filter(|o| o.chat == chat)
        .map(|o| o.text.as_str())
        .collect()
}
