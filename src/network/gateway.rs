//! Gateway - Telegram long-poll loop.
//!
//! The Gateway owns the HTTP client, pulls updates from the Bot API,
//! converts them to engine events, dispatches through the handler registry,
//! and delivers the resulting notifications. Delivery is fire-and-forget:
//! API failures are logged and never fed back into engine state.

use crate::config::TelegramConfig;
use crate::handlers::{Event, Registry};
use crate::network::api::{
    ApiResponse, BotCommand, CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup,
    SendMessage, Update,
};
use crate::replies;
use crate::state::{ChatId, Matchmaker, Outbound, Prompt};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Grace added on top of the long-poll timeout for the HTTP client.
const HTTP_TIMEOUT_GRACE: Duration = Duration::from_secs(10);

/// Pause before retrying after a failed poll.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Telegram Bot API call errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{method} rejected by Telegram: {description}")]
    Rejected { method: String, description: String },
}

/// Keyboard cleanup info for a processed callback.
struct CallbackAck {
    query_id: String,
    /// Chat and message carrying the pressed keyboard.
    keyboard: Option<(ChatId, i64)>,
}

/// The Gateway polls the Bot API and routes updates into the engine.
pub struct Gateway {
    client: reqwest::Client,
    /// `https://api.telegram.org/bot<token>` prefix.
    base: String,
    poll_timeout_secs: u64,
    engine: Arc<Matchmaker>,
    registry: Registry,
}

impl Gateway {
    pub fn new(
        config: &TelegramConfig,
        token: &str,
        engine: Arc<Matchmaker>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs) + HTTP_TIMEOUT_GRACE)
            .user_agent("iskrad/0.2")
            .build()?;
        Ok(Self {
            client,
            base: format!("{}/bot{}", config.api_url.trim_end_matches('/'), token),
            poll_timeout_secs: config.poll_timeout_secs,
            engine,
            registry: Registry::new(),
        })
    }

    /// Register the command menu and run the long-poll loop forever.
    pub async fn run(&self) -> anyhow::Result<()> {
        self.register_commands().await;
        info!(timeout = self.poll_timeout_secs, "entering long-poll loop");

        let mut offset: i64 = 0;
        loop {
            let updates = match self.get_updates(offset).await {
                Ok(updates) => updates,
                Err(err) => {
                    warn!(error = %err, "getUpdates failed, retrying");
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                    continue;
                }
            };

            for update in updates {
                offset = offset.max(update.update_id + 1);
                self.process(update).await;
            }
        }
    }

    /// Register the three-command menu. Failure is logged, not fatal.
    async fn register_commands(&self) {
        let commands = [
            BotCommand {
                command: "start",
                description: replies::MENU_START,
            },
            BotCommand {
                command: "stop",
                description: replies::MENU_STOP,
            },
            BotCommand {
                command: "next",
                description: replies::MENU_NEXT,
            },
        ];
        if let Err(err) = self
            .call::<bool, _>("setMyCommands", &json!({ "commands": commands }))
            .await
        {
            warn!(error = %err, "failed to set command menu");
        }
    }

    /// Convert one update to an event, dispatch it, and deliver the results.
    async fn process(&self, update: Update) {
        let Some((event, ack)) = event_from_update(update) else {
            return;
        };
        debug!(chat = event.chat(), "processing event");

        let outbox = self.registry.dispatch(&self.engine, &event).await;

        // Acknowledge the button press and drop the served keyboard.
        if let Some(ack) = ack {
            if let Err(err) = self
                .call::<bool, _>("answerCallbackQuery", &json!({ "callback_query_id": ack.query_id }))
                .await
            {
                debug!(error = %err, "answerCallbackQuery failed");
            }
            if let Some((chat, message_id)) = ack.keyboard {
                if let Err(err) = self
                    .call::<bool, _>(
                        "deleteMessage",
                        &json!({ "chat_id": chat, "message_id": message_id }),
                    )
                    .await
                {
                    debug!(chat, message_id, error = %err, "deleteMessage failed");
                }
            }
        }

        for outbound in outbox {
            if let Err(err) = self.send_message(&outbound).await {
                warn!(chat = outbound.chat, error = %err, "sendMessage failed");
            }
        }
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ApiError> {
        self.call(
            "getUpdates",
            &json!({ "offset": offset, "timeout": self.poll_timeout_secs }),
        )
        .await
    }

    async fn send_message(&self, outbound: &Outbound) -> Result<(), ApiError> {
        let body = SendMessage {
            chat_id: outbound.chat,
            text: &outbound.text,
            parse_mode: "Markdown",
            reply_markup: outbound.prompt.map(keyboard_for),
        };
        self.call::<serde_json::Value, _>("sendMessage", &body).await?;
        Ok(())
    }

    /// POST one Bot API method and unwrap the response envelope.
    async fn call<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base, method);
        let response: ApiResponse<T> = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .json()
            .await?;
        if response.ok {
            response.result.ok_or_else(|| ApiError::Rejected {
                method: method.to_string(),
                description: "missing result".to_string(),
            })
        } else {
            Err(ApiError::Rejected {
                method: method.to_string(),
                description: response
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            })
        }
    }
}

/// Map an engine prompt to its inline keyboard.
fn keyboard_for(prompt: Prompt) -> InlineKeyboardMarkup {
    let rows = match prompt {
        Prompt::ChooseGender => vec![vec![
            InlineKeyboardButton {
                text: replies::BUTTON_MALE,
                callback_data: "gender_male",
            },
            InlineKeyboardButton {
                text: replies::BUTTON_FEMALE,
                callback_data: "gender_female",
            },
        ]],
        Prompt::BeginSearch => vec![vec![InlineKeyboardButton {
            text: replies::BUTTON_BEGIN,
            callback_data: "start_chat",
        }]],
    };
    InlineKeyboardMarkup {
        inline_keyboard: rows,
    }
}

/// Convert a raw update into an engine event plus callback cleanup info.
///
/// Updates without text or callback data (stickers, edits, joins) are
/// dropped here.
fn event_from_update(update: Update) -> Option<(Event, Option<CallbackAck>)> {
    if let Some(query) = update.callback_query {
        let CallbackQuery {
            id,
            from,
            message,
            data,
        } = query;
        let event = Event::Callback {
            chat: from.id,
            data: data?,
        };
        let ack = CallbackAck {
            query_id: id,
            keyboard: message.map(|m| (m.chat.id, m.message_id)),
        };
        return Some((event, Some(ack)));
    }

    let message = update.message?;
    let event = Event::Text {
        chat: message.chat.id,
        text: message.text?,
    };
    Some((event, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::api::{Chat, Message, User};

    fn message_update(chat: i64, text: Option<&str>) -> Update {
        Update {
            update_id: 1,
            message: Some(Message {
                message_id: 10,
                chat: Chat { id: chat },
                text: text.map(str::to_string),
            }),
            callback_query: None,
        }
    }

    #[test]
    fn text_update_becomes_text_event() {
        let (event, ack) = event_from_update(message_update(7, Some("/next"))).unwrap();
        assert_eq!(
            event,
            Event::Text {
                chat: 7,
                text: "/next".to_string()
            }
        );
        assert!(ack.is_none());
    }

    #[test]
    fn textless_update_is_dropped() {
        assert!(event_from_update(message_update(7, None)).is_none());
    }

    #[test]
    fn callback_update_carries_cleanup_info() {
        let update = Update {
            update_id: 2,
            message: None,
            callback_query: Some(CallbackQuery {
                id: "q1".to_string(),
                from: User { id: 9 },
                message: Some(Message {
                    message_id: 33,
                    chat: Chat { id: 9 },
                    text: None,
                }),
                data: Some("start_chat".to_string()),
            }),
        };
        let (event, ack) = event_from_update(update).unwrap();
        assert_eq!(
            event,
            Event::Callback {
                chat: 9,
                data: "start_chat".to_string()
            }
        );
        let ack = ack.unwrap();
        assert_eq!(ack.query_id, "q1");
        assert_eq!(ack.keyboard, Some((9, 33)));
    }

    #[test]
    fn both_prompts_map_to_their_keyboards() {
        let gender = keyboard_for(Prompt::ChooseGender);
        assert_eq!(gender.inline_keyboard[0].len(), 2);
        assert_eq!(gender.inline_keyboard[0][0].callback_data, "gender_male");

        let begin = keyboard_for(Prompt::BeginSearch);
        assert_eq!(begin.inline_keyboard[0].len(), 1);
        assert_eq!(begin.inline_keyboard[0][0].callback_data, "start_chat");
    }
}
