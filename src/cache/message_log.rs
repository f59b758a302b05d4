//! Recent message log.
//!
//! Telegram reaction updates only name the message they target, not its
//! text, so text messages are remembered here for a while.

use std::sync::Arc;

use moka::sync::Cache;
use teloxide::types::{ChatId, MessageId};

use super::CacheConfig;

/// Bounded map of `(chat, message) -> text`.
///
/// Clone-friendly: clones share the same underlying cache.
#[derive(Clone)]
pub struct MessageLog {
    inner: Arc<Cache<(ChatId, MessageId), String>>,
}

impl MessageLog {
    pub fn new(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            inner: Arc::new(builder.build()),
        }
    }

    /// Remember the text of a message.
    pub fn record(&self, chat_id: ChatId, message_id: MessageId, text: &str) {
        self.inner.insert((chat_id, message_id), text.to_string());
    }

    /// Text of a remembered message.
    pub fn get(&self, chat_id: ChatId, message_id: MessageId) -> Option<String> {
        self.inner.get(&(chat_id, message_id))
    }
}

impl std::fmt::Debug for MessageLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageLog")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_get() {
        let log = MessageLog::new(CacheConfig::recent_messages());

        log.record(ChatId(1), MessageId(10), "Great point");

        assert_eq!(log.get(ChatId(1), MessageId(10)).as_deref(), Some("Great point"));
        assert_eq!(log.get(ChatId(2), MessageId(10)), None);
        assert_eq!(log.get(ChatId(1), MessageId(11)), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let log = MessageLog::new(CacheConfig::default());
        let other = log.clone();

        other.record(ChatId(1), MessageId(1), "shared");

        assert_eq!(log.get(ChatId(1), MessageId(1)).as_deref(), Some("shared"));
    }
}
