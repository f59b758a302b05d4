//! Room notifications.
//!
//! Outbound messages to the quotes room, with the anti-spam gate applied
//! where requested.

mod gate;

pub use gate::NotificationGate;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, ReactionType};
use tracing::debug;

use crate::bot::dispatcher::ThrottledBot;

/// Outbound chat actions used by the handlers and the scheduler.
#[async_trait]
pub trait RoomSender: Send + Sync {
    async fn send_text(&self, room: ChatId, text: &str) -> anyhow::Result<()>;

    /// Send text with Telegram HTML formatting.
    async fn send_html(&self, room: ChatId, text: &str) -> anyhow::Result<()>;

    /// Replace the bot's reaction on a message with `emoji`.
    async fn react(&self, room: ChatId, message_id: MessageId, emoji: &str) -> anyhow::Result<()>;
}

#[async_trait]
impl RoomSender for ThrottledBot {
    async fn send_text(&self, room: ChatId, text: &str) -> anyhow::Result<()> {
        self.send_message(room, text).await?;
        Ok(())
    }

    async fn send_html(&self, room: ChatId, text: &str) -> anyhow::Result<()> {
        self.send_message(room, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn react(&self, room: ChatId, message_id: MessageId, emoji: &str) -> anyhow::Result<()> {
        let reaction = ReactionType::Emoji {
            emoji: emoji.to_string(),
        };
        self.set_message_reaction(room, message_id)
            .reaction(vec![reaction])
            .await?;
        Ok(())
    }
}

/// Posts into the configured quotes room and keeps the gate up to date.
#[derive(Clone)]
pub struct RoomNotifier<S> {
    sender: S,
    room: ChatId,
    gate: NotificationGate,
}

impl<S: RoomSender> RoomNotifier<S> {
    pub fn new(sender: S, room: ChatId, gate: NotificationGate) -> Self {
        Self { sender, room, gate }
    }

    /// Send unconditionally.
    pub async fn send(&self, text: &str) -> anyhow::Result<()> {
        self.sender.send_text(self.room, text).await?;
        self.gate.mark_sent();
        Ok(())
    }

    /// Send only if someone else spoke since the bot's last post.
    ///
    /// Returns whether the message went out.
    pub async fn avoid_spam_send(&self, text: &str) -> anyhow::Result<bool> {
        if !self.gate.should_send() {
            debug!("Bot spoke last in room {}, dropping notification", self.room);
            return Ok(false);
        }

        self.send(text).await?;
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use teloxide::types::{ChatId, MessageId};

    use super::RoomSender;

    /// Sender that records instead of talking to Telegram.
    #[derive(Clone, Default)]
    pub struct RecordingSender {
        sent: Arc<Mutex<Vec<(ChatId, String)>>>,
        html: Arc<Mutex<Vec<String>>>,
        reactions: Arc<Mutex<Vec<(ChatId, MessageId, String)>>>,
        reject_reactions: bool,
    }

    impl RecordingSender {
        /// A sender whose reaction calls fail, like Telegram rejecting an emoji.
        pub fn rejecting_reactions() -> Self {
            Self {
                reject_reactions: true,
                ..Self::default()
            }
        }

        /// Every message sent, plain or formatted.
        pub fn sent(&self) -> Vec<(ChatId, String)> {
            self.sent.lock().unwrap().clone()
        }

        /// Texts sent with HTML formatting.
        pub fn html(&self) -> Vec<String> {
            self.html.lock().unwrap().clone()
        }

        pub fn reactions(&self) -> Vec<(ChatId, MessageId, String)> {
            self.reactions.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RoomSender for RecordingSender {
        async fn send_text(&self, room: ChatId, text: &str) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push((room, text.to_string()));
            Ok(())
        }

        async fn send_html(&self, room: ChatId, text: &str) -> anyhow::Result<()> {
            self.html.lock().unwrap().push(text.to_string());
            self.send_text(room, text).await
        }

        async fn react(&self, room: ChatId, message_id: MessageId, emoji: &str) -> anyhow::Result<()> {
            if self.reject_reactions {
                anyhow::bail!("REACTION_INVALID");
            }
            self.reactions
                .lock()
                .unwrap()
                .push((room, message_id, emoji.to_string()));
            Ok(())
        }
    }
}
