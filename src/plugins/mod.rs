//! Plugin system for command handlers.
//!
//! Commands are `!`-prefixed text messages rather than Telegram `/commands`,
//! so handlers are selected by pattern instead of `BotCommands`.

pub mod help;
pub mod quotes;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use quotes::QuoteCommand;

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter_map(|msg: Message| msg.text().and_then(QuoteCommand::parse))
        .endpoint(quotes::quote_command)
}
