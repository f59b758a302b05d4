//! Reaction-to-save.
//!
//! Reacting to a message with one of the save emoji stores its text as a new
//! quote and acknowledges with a reaction of its own.

use std::sync::LazyLock;

use regex::Regex;
use teloxide::prelude::*;
use teloxide::types::{MessageId, MessageReactionUpdated, ReactionType};
use tracing::{debug, info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::notify::RoomSender;
use crate::quotes::{QuoteError, QuoteId};

/// Anything that looks like a quote id citation.
static QUOTE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Q.{3}").unwrap());

/// Whether text already cites a quote (so saving it would nest quotes).
pub fn looks_like_quote_reference(text: &str) -> bool {
    QUOTE_REFERENCE.is_match(text)
}

/// Plain emoji present in `new` but not in `old`.
fn added_emojis<'a>(
    old: &'a [ReactionType],
    new: &'a [ReactionType],
) -> impl Iterator<Item = &'a str> + 'a {
    new.iter()
        .filter(move |r| !old.contains(r))
        .filter_map(|r| match r {
            ReactionType::Emoji { emoji } => Some(emoji.as_str()),
            _ => None,
        })
}

/// Save `text` as a quote if one of `emojis` is a save emoji.
///
/// Returns the new quote id, or `None` when the reaction is ignored.
pub async fn save_reacted<'a>(
    state: &AppState,
    mut emojis: impl Iterator<Item = &'a str>,
    text: &str,
) -> Result<Option<QuoteId>, QuoteError> {
    if !emojis.any(|e| state.reactions.is_save_emoji(e)) {
        return Ok(None);
    }

    if looks_like_quote_reference(text) {
        debug!("Reacted message already cites a quote, not saving");
        return Ok(None);
    }

    let id = state.quotes.repo.add(text).await?;
    Ok(Some(id))
}

/// Handle a reaction update.
pub async fn reaction_handler(
    bot: ThrottledBot,
    update: MessageReactionUpdated,
    state: AppState,
) -> anyhow::Result<()> {
    on_reaction(
        &bot,
        &state,
        update.chat.id,
        update.message_id,
        &update.old_reaction,
        &update.new_reaction,
    )
    .await
}

async fn on_reaction<S: RoomSender>(
    sender: &S,
    state: &AppState,
    chat_id: ChatId,
    message_id: MessageId,
    old: &[ReactionType],
    new: &[ReactionType],
) -> anyhow::Result<()> {
    let mut added = added_emojis(old, new).peekable();
    if added.peek().is_none() {
        return Ok(());
    }

    let Some(text) = state.messages.get(chat_id, message_id) else {
        debug!("Reaction on unknown message {} in chat {}", message_id.0, chat_id);
        return Ok(());
    };

    let id = match save_reacted(state, added, &text).await {
        Ok(Some(id)) => id,
        Ok(None) => return Ok(()),
        Err(e @ QuoteError::IdSpaceExhausted { .. }) => {
            warn!("Cannot save message {} as quote: {}", message_id.0, e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    info!("Saved message {} in chat {} as quote {}", message_id.0, chat_id, id);

    if let Err(e) = sender.react(chat_id, message_id, &state.reactions.ack_emoji).await {
        warn!("Failed to acknowledge saved quote {}: {}", id, e);
    }

    Ok(())
}
