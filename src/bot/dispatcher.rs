//! Message dispatcher setup.
//!
//! Builds the dispatcher with the quote command handler and reaction handler.

use teloxide::adaptors::Throttle;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::UserId;

use crate::cache::{CacheConfig, MessageLog};
use crate::config::{Config, ReactionSettings};
use crate::events;
use crate::notify::NotificationGate;
use crate::plugins;
use crate::quotes::QuoteBook;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Quote repository and query engine.
    pub quotes: QuoteBook,

    /// Recent messages, for resolving reaction targets.
    pub messages: MessageLog,

    /// Anti-spam gate for the quotes room.
    pub gate: NotificationGate,

    /// The quotes room, if configured.
    pub quotes_room: Option<ChatId>,

    /// Reaction-to-save emoji.
    pub reactions: ReactionSettings,

    /// The bot's own user id.
    pub bot_id: UserId,
}

impl AppState {
    /// Create a new application state.
    pub fn new(quotes: QuoteBook, gate: NotificationGate, config: &Config, bot_id: UserId) -> Self {
        Self {
            quotes,
            messages: MessageLog::new(CacheConfig::recent_messages()),
            gate,
            quotes_room: config.quotes_room.map(ChatId),
            reactions: config.reactions.clone(),
            bot_id,
        }
    }

    /// Check if a chat is the quotes room.
    pub fn is_quotes_room(&self, chat_id: ChatId) -> bool {
        self.quotes_room == Some(chat_id)
    }

    /// Record that the bot posted in `chat_id`.
    pub fn note_bot_post(&self, chat_id: ChatId) {
        if self.is_quotes_room(chat_id) {
            self.gate.mark_sent();
        }
    }
}

/// Build the dispatcher with all handlers.
pub fn build_dispatcher(
    bot: ThrottledBot,
    state: AppState,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    use teloxide::dispatching::UpdateFilterExt;

    // Activity tracking first, then commands
    let message_handler = Update::filter_message()
        .inspect(events::track_activity)
        .branch(plugins::command_handler());

    let reaction_handler = Update::filter_message_reaction_updated()
        .endpoint(events::reaction_handler);

    dptree::entry()
        .branch(message_handler)
        .branch(reaction_handler)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use teloxide::types::{ChatId, UserId};

    use super::AppState;
    use crate::cache::{CacheConfig, MessageLog};
    use crate::config::ReactionSettings;
    use crate::notify::NotificationGate;
    use crate::quotes::{MemoryQuoteStore, QuoteBook};

    pub const BOT_ID: UserId = UserId(999);
    pub const QUOTES_ROOM: ChatId = ChatId(-100_777);

    /// State over an empty in-memory store; returns the store for inspection.
    pub fn state() -> (AppState, Arc<MemoryQuoteStore>) {
        state_with(MemoryQuoteStore::new())
    }

    pub fn state_with(store: MemoryQuoteStore) -> (AppState, Arc<MemoryQuoteStore>) {
        let store = Arc::new(store);
        let state = AppState {
            quotes: QuoteBook::new(store.clone()),
            messages: MessageLog::new(CacheConfig::recent_messages()),
            gate: NotificationGate::new(),
            quotes_room: Some(QUOTES_ROOM),
            reactions: ReactionSettings::default(),
            bot_id: BOT_ID,
        };
        (state, store)
    }
}
