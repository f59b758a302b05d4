//! Quotebook - quote keeping Telegram bot
//!
//! Lets a group store, search, edit and resurface memorable quotes.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `quotes` - Quote repository and query engine (store-agnostic)
//! - `database` - MongoDB quote store
//! - `cache` - Recent message log with Moka
//! - `notify` - Room notifications and the anti-spam gate
//! - `scheduler` - Cron-driven random quote posts
//! - `bot` - Dispatcher and runtime (with Throttle for API rate limiting)
//! - `plugins` - `!q` command handlers
//! - `events` - Activity tracking and reaction-to-save
//! - `utils` - Utility functions

mod bot;
mod cache;
mod config;
mod database;
mod events;
mod notify;
mod plugins;
mod quotes;
mod scheduler;
mod utils;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use teloxide::adaptors::throttle::Limits;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bot::AppState;
use config::Config;
use database::{Database, MongoQuoteStore};
use notify::{NotificationGate, RoomNotifier};
use quotes::QuoteBook;
use scheduler::{Jitter, QuoteScheduler, ScheduledPost};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quotebook=info,teloxide=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting quotebook bot...");

    let config = Config::from_env()?;
    info!("Configuration loaded successfully");
    info!("Bot mode: {:?}", config.bot_mode);

    // MongoDB connects lazily on the first quote operation
    let db = Arc::new(Database::new(config.mongo.clone()));
    let store = Arc::new(MongoQuoteStore::new(db, &config.mongo.collection));
    let quotes = QuoteBook::new(store);

    let bot = Bot::new(&config.bot_token).throttle(Limits::default());
    info!("Bot initialized with rate limiting (Throttle)");

    let me = bot.get_me().await?;
    info!("Bot username: @{}", me.username());

    let gate = NotificationGate::new();

    match config.quotes_room {
        Some(room) => {
            let notifier = RoomNotifier::new(bot.clone(), ChatId(room), gate.clone());
            let post = ScheduledPost::new(
                quotes.query.clone(),
                notifier,
                Jitter::default(),
                config.skip_when_quiet,
            );
            QuoteScheduler::new(config.schedule.clone(), post).spawn();
            info!("Scheduled quotes enabled for chat {}", room);
        }
        None => warn!("QUOTES_ROOM not set, scheduled quotes disabled"),
    }

    let state = AppState::new(quotes, gate, &config, me.id);
    let dispatcher = bot::build_dispatcher(bot.clone(), state);

    bot::run(&config, dispatcher, bot).await
}
