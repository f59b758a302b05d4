//! Webhook mode.
//!
//! teloxide's axum listener registers the webhook with Telegram, serves
//! updates on the configured port and removes the webhook on shutdown.
//! Its registration sends no update filter, and Telegram leaves out
//! reaction updates unless they are asked for, so the webhook is
//! registered again with [`allowed_updates`].

use std::net::SocketAddr;

use anyhow::Context;
use teloxide::prelude::*;
use teloxide::types::AllowedUpdate;
use teloxide::update_listeners::webhooks::{self, Options};
use tracing::info;
use url::Url;

use super::dispatcher::ThrottledBot;
use crate::config::Config;

/// Update kinds the dispatcher handles.
pub fn allowed_updates() -> Vec<AllowedUpdate> {
    vec![AllowedUpdate::Message, AllowedUpdate::MessageReaction]
}

/// Start the bot in webhook mode and dispatch until shutdown.
pub async fn start_webhook(
    config: &Config,
    mut dispatcher: Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey>,
    bot: ThrottledBot,
) -> anyhow::Result<()> {
    let webhook_url = config
        .webhook_url
        .as_deref()
        .context("WEBHOOK_URL must be set when using webhook mode")?;
    let url = Url::parse(webhook_url).context("Invalid WEBHOOK_URL format")?;

    // Listen on all interfaces at the configured port
    let address = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));

    let mut options = Options::new(address, url.clone());
    if let Some(secret) = &config.webhook_secret {
        options = options.secret_token(secret.clone());
        info!("Webhook secret token configured");
    }

    info!("Setting webhook URL: {}", url);
    info!("Listening on: {}", address);

    // setWebhook only needs the plain bot, not the throttled one
    let listener = webhooks::axum(bot.inner().clone(), options)
        .await
        .context("Failed to set up webhook")?;

    let mut register = bot
        .inner()
        .set_webhook(url)
        .allowed_updates(allowed_updates());
    if let Some(secret) = &config.webhook_secret {
        register = register.secret_token(secret.clone());
    }
    register
        .await
        .context("Failed to register webhook update types")?;

    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Error from update listener"),
        )
        .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_updates_include_reactions() {
        assert_eq!(
            allowed_updates(),
            vec![AllowedUpdate::Message, AllowedUpdate::MessageReaction]
        );
    }
}
