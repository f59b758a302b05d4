//! Cache module - in-memory caches built on Moka.
//!
//! Quote data is never cached; the only cache is the recent message log
//! used to resolve reaction targets.

mod config;
mod message_log;

pub use config::CacheConfig;
pub use message_log::MessageLog;
