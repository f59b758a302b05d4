//! Configuration module for the quotebook bot.
//!
//! Loads configuration from environment variables.

use std::env;

use anyhow::{Context, anyhow};
use serde::Deserialize;

use crate::database::MongoSettings;
use crate::scheduler::QuoteSchedule;

/// Default cron: midnight on days 1, 8, 15, 22 and 29 of every month.
pub const DEFAULT_SCHEDULE: &str = "0 0 0 1/7 * * *";
pub const DEFAULT_TIMEZONE: &str = "Europe/Zurich";

/// Bot running mode
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Emoji handling for reaction-to-save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSettings {
    /// Reactions that save the reacted message as a quote.
    pub save_emojis: Vec<String>,
    /// Reaction put on the message once it is saved.
    pub ack_emoji: String,
}

impl Default for ReactionSettings {
    fn default() -> Self {
        Self {
            save_emojis: vec!["📝".to_string(), "🔖".to_string()],
            ack_emoji: "✅".to_string(),
        }
    }
}

impl ReactionSettings {
    pub fn is_save_emoji(&self, emoji: &str) -> bool {
        self.save_emojis.iter().any(|e| e == emoji)
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    // MongoDB
    pub mongo: MongoSettings,

    // Quotes
    /// Chat the scheduled quotes go to. Scheduling is off without it.
    pub quotes_room: Option<i64>,
    pub schedule: QuoteSchedule,
    /// Route scheduled posts through the anti-spam gate.
    pub skip_when_quiet: bool,
    pub reactions: ReactionSettings,
}

impl Config {
    /// Load configuration from environment variables (and `.env`).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_mode = match var("BOT_MODE").map(|m| m.to_lowercase()).as_deref() {
            Some("webhook") => BotMode::Webhook,
            _ => BotMode::Polling,
        };

        let webhook_url = var("WEBHOOK_URL");
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(anyhow!("WEBHOOK_URL must be set when BOT_MODE is webhook"));
        }

        let webhook_port = match var("WEBHOOK_PORT") {
            Some(port) => port.parse().context("WEBHOOK_PORT must be a port number")?,
            None => 8080,
        };

        let mongo = MongoSettings {
            uri: var("MONGODB_URI"),
            host: var("MONGODB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: match var("MONGODB_PORT") {
                Some(port) => port.parse().context("MONGODB_PORT must be a port number")?,
                None => 27017,
            },
            user: var("MONGODB_USER"),
            password: var("MONGODB_PASSWORD"),
            database: var("MONGODB_DATABASE").unwrap_or_else(|| "quotebook".to_string()),
            collection: var("QUOTES_COLLECTION").unwrap_or_else(|| "quotes".to_string()),
        };

        let quotes_room = var("QUOTES_ROOM")
            .map(|room| room.parse::<i64>())
            .transpose()
            .context("QUOTES_ROOM must be a numeric chat id")?;

        let schedule = QuoteSchedule::parse(
            var("QUOTE_SCHEDULE").as_deref().unwrap_or(DEFAULT_SCHEDULE),
            var("QUOTE_TIMEZONE").as_deref().unwrap_or(DEFAULT_TIMEZONE),
        )?;

        let skip_when_quiet = var("QUOTE_SKIP_WHEN_QUIET")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let defaults = ReactionSettings::default();
        let reactions = ReactionSettings {
            save_emojis: var("QUOTE_SAVE_REACTIONS")
                .map(|list| {
                    list.split(',')
                        .map(|e| e.trim().to_string())
                        .filter(|e| !e.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.save_emojis),
            ack_emoji: var("QUOTE_ACK_REACTION").unwrap_or(defaults.ack_emoji),
        };

        Ok(Self {
            bot_token: var("BOT_TOKEN").context("BOT_TOKEN must be set")?,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: var("WEBHOOK_SECRET"),
            mongo,
            quotes_room,
            schedule,
            skip_when_quiet,
            reactions,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("BOT_TOKEN", "123:abc")]).unwrap();

        assert_eq!(config.bot_mode, BotMode::Polling);
        assert_eq!(config.webhook_port, 8080);
        assert_eq!(config.mongo.host, "localhost");
        assert_eq!(config.mongo.port, 27017);
        assert_eq!(config.mongo.database, "quotebook");
        assert_eq!(config.mongo.collection, "quotes");
        assert_eq!(config.quotes_room, None);
        assert!(!config.skip_when_quiet);
        assert_eq!(config.reactions, ReactionSettings::default());
    }

    #[test]
    fn test_missing_token_is_an_error() {
        assert!(load(&[]).is_err());
    }

    #[test]
    fn test_webhook_requires_url() {
        assert!(load(&[("BOT_TOKEN", "t"), ("BOT_MODE", "webhook")]).is_err());

        let config = load(&[
            ("BOT_TOKEN", "t"),
            ("BOT_MODE", "Webhook"),
            ("WEBHOOK_URL", "https://example.org/hook"),
            ("WEBHOOK_PORT", "9000"),
        ])
        .unwrap();
        assert_eq!(config.bot_mode, BotMode::Webhook);
        assert_eq!(config.webhook_port, 9000);
    }

    #[test]
    fn test_quotes_settings() {
        let config = load(&[
            ("BOT_TOKEN", "t"),
            ("QUOTES_ROOM", "-1001234"),
            ("QUOTES_COLLECTION", "memorable"),
            ("QUOTE_SKIP_WHEN_QUIET", "true"),
            ("QUOTE_SAVE_REACTIONS", "✍, 📝 ,"),
            ("QUOTE_ACK_REACTION", "👌"),
        ])
        .unwrap();

        assert_eq!(config.quotes_room, Some(-1001234));
        assert_eq!(config.mongo.collection, "memorable");
        assert!(config.skip_when_quiet);
        assert_eq!(config.reactions.save_emojis, vec!["✍", "📝"]);
        assert_eq!(config.reactions.ack_emoji, "👌");
        assert!(config.reactions.is_save_emoji("✍"));
        assert!(!config.reactions.is_save_emoji("🔖"));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(load(&[("BOT_TOKEN", "t"), ("QUOTES_ROOM", "general")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("MONGODB_PORT", "lots")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("QUOTE_SCHEDULE", "weekly")]).is_err());
        assert!(load(&[("BOT_TOKEN", "t"), ("QUOTE_TIMEZONE", "Nowhere/Land")]).is_err());
    }
}
