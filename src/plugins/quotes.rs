//! Quote command handlers.
//!
//! Commands are plain-text `!q ...` messages matched against fixed patterns
//! at the start of the message.

use std::sync::LazyLock;

use regex::Regex;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::notify::RoomSender;
use crate::quotes::{QuoteError, QuoteId};
use crate::utils::split_message;

use super::help;

/// Prefix for quotes shown in chat.
pub const SPEAKER: &str = "🗣️";

/// Shortest accepted search filter, in characters.
pub const MIN_SEARCH_LEN: usize = 3;

static RANDOM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!q$").unwrap());
static SHOW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!q (Q.{3})$").unwrap());
static ADD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!q add (.+)$").unwrap());
static DELETE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!q delete (Q.{3})$").unwrap());
static MODIFY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!q modify (Q.{3}) (.+)$").unwrap());
static COUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!q count$").unwrap());
static SEARCH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!q search (.+)$").unwrap());
static HELP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!help quotes").unwrap());

/// A parsed quote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteCommand {
    Random,
    Show(QuoteId),
    Add(String),
    Delete(QuoteId),
    Modify(QuoteId, String),
    Count,
    Search(String),
    Help,
}

impl QuoteCommand {
    /// Match message text against the command patterns.
    pub fn parse(text: &str) -> Option<Self> {
        if RANDOM.is_match(text) {
            return Some(Self::Random);
        }
        if let Some(caps) = SHOW.captures(text) {
            return QuoteId::parse(&caps[1]).map(Self::Show);
        }
        if let Some(caps) = ADD.captures(text) {
            return Some(Self::Add(caps[1].to_string()));
        }
        if let Some(caps) = DELETE.captures(text) {
            return QuoteId::parse(&caps[1]).map(Self::Delete);
        }
        if let Some(caps) = MODIFY.captures(text) {
            return QuoteId::parse(&caps[1]).map(|id| Self::Modify(id, caps[2].to_string()));
        }
        if COUNT.is_match(text) {
            return Some(Self::Count);
        }
        if let Some(caps) = SEARCH.captures(text) {
            return Some(Self::Search(caps[1].to_string()));
        }
        if HELP.is_match(text) {
            return Some(Self::Help);
        }
        None
    }
}

/// Run a command and produce the reply text.
///
/// Domain outcomes (unknown id, short search, empty store, no free id) are
/// replies; only storage failures are errors.
pub async fn execute(state: &AppState, cmd: &QuoteCommand) -> anyhow::Result<String> {
    let book = &state.quotes;

    let reply = match cmd {
        QuoteCommand::Random => format!("{SPEAKER}{}", book.query.random_line().await?),
        QuoteCommand::Show(id) => {
            let text = book.repo.get(id).await?;
            format!("{SPEAKER}{}", text.as_deref().unwrap_or("Quote ID not found"))
        }
        QuoteCommand::Add(text) => match book.repo.add(text).await {
            Ok(id) => format!("quote added with id: {id}"),
            Err(e @ QuoteError::IdSpaceExhausted { .. }) => {
                warn!("Cannot add quote: {}", e);
                "No free quote ids left".to_string()
            }
            Err(e) => return Err(e.into()),
        },
        QuoteCommand::Delete(id) => {
            book.repo.delete(id).await?;
            "OK".to_string()
        }
        QuoteCommand::Modify(id, text) => {
            if book.repo.modify(id, text).await? {
                format!("Quote {id} edited")
            } else {
                format!("Quote {id} not found")
            }
        }
        QuoteCommand::Count => book.query.count().await?.to_string(),
        QuoteCommand::Search(filter) => {
            if filter.chars().count() < MIN_SEARCH_LEN {
                format!("Use at least {MIN_SEARCH_LEN} characters")
            } else {
                let found = book.query.list(Some(filter)).await?;
                if found.is_empty() {
                    "No results found".to_string()
                } else {
                    found
                        .iter()
                        .map(|q| q.to_string())
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
        }
        QuoteCommand::Help => help::get_text(&state.reactions),
    };

    Ok(reply)
}

/// Handle a matched quote command.
pub async fn quote_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    cmd: QuoteCommand,
) -> anyhow::Result<()> {
    info!("Quote command {:?} in chat {}", cmd, msg.chat.id);
    respond(&bot, &state, msg.chat.id, &cmd).await
}

/// Execute `cmd` and post the reply into `chat_id`, split to fit.
async fn respond<S: RoomSender>(
    sender: &S,
    state: &AppState,
    chat_id: ChatId,
    cmd: &QuoteCommand,
) -> anyhow::Result<()> {
    let reply = execute(state, cmd).await?;

    for chunk in split_message(&reply) {
        if *cmd == QuoteCommand::Help {
            sender.send_html(chat_id, &chunk).await?;
        } else {
            sender.send_text(chat_id, &chunk).await?;
        }
    }

    state.note_bot_post(chat_id);
    Ok(())
}
