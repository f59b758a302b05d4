//! Backing store abstraction for quotes.

use async_trait::async_trait;

use super::model::{Quote, QuoteId};

/// Keyed, asynchronous collection of quotes.
///
/// Each method is a single round trip to the backend. Implementations must
/// treat `put` as an upsert and `delete` of a missing key as a no-op.
/// `insert` must be atomic: of two concurrent inserts under one id, exactly
/// one succeeds.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// Store `quote` only if its id is unused. Returns `false` when taken.
    async fn insert(&self, quote: &Quote) -> anyhow::Result<bool>;

    /// Insert or replace the text stored under `quote.id`.
    async fn put(&self, quote: &Quote) -> anyhow::Result<()>;

    /// Fetch the text stored under `id`.
    async fn get(&self, id: &QuoteId) -> anyhow::Result<Option<String>>;

    /// Remove `id`. Returns whether something was removed.
    async fn delete(&self, id: &QuoteId) -> anyhow::Result<bool>;

    /// All stored quotes, in store order.
    async fn find_all(&self) -> anyhow::Result<Vec<Quote>>;

    /// Live count of stored quotes.
    async fn count(&self) -> anyhow::Result<u64>;
}

#[cfg(test)]
pub use memory::MemoryQuoteStore;

#[cfg(test)]
mod memory {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::QuoteStore;
    use crate::quotes::model::{Quote, QuoteId};

    /// Insertion-ordered in-memory store for tests.
    #[derive(Default)]
    pub struct MemoryQuoteStore {
        quotes: Mutex<Vec<Quote>>,
    }

    impl MemoryQuoteStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_quotes(quotes: impl IntoIterator<Item = Quote>) -> Self {
            Self {
                quotes: Mutex::new(quotes.into_iter().collect()),
            }
        }

        pub fn snapshot(&self) -> Vec<Quote> {
            self.quotes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QuoteStore for MemoryQuoteStore {
        async fn insert(&self, quote: &Quote) -> anyhow::Result<bool> {
            let mut quotes = self.quotes.lock().unwrap();
            if quotes.iter().any(|q| q.id == quote.id) {
                return Ok(false);
            }
            quotes.push(quote.clone());
            Ok(true)
        }

        async fn put(&self, quote: &Quote) -> anyhow::Result<()> {
            let mut quotes = self.quotes.lock().unwrap();
            match quotes.iter_mut().find(|q| q.id == quote.id) {
                Some(existing) => existing.text = quote.text.clone(),
                None => quotes.push(quote.clone()),
            }
            Ok(())
        }

        async fn get(&self, id: &QuoteId) -> anyhow::Result<Option<String>> {
            let quotes = self.quotes.lock().unwrap();
            Ok(quotes.iter().find(|q| &q.id == id).map(|q| q.text.clone()))
        }

        async fn delete(&self, id: &QuoteId) -> anyhow::Result<bool> {
            let mut quotes = self.quotes.lock().unwrap();
            let before = quotes.len();
            quotes.retain(|q| &q.id != id);
            Ok(quotes.len() != before)
        }

        async fn find_all(&self) -> anyhow::Result<Vec<Quote>> {
            Ok(self.snapshot())
        }

        async fn count(&self) -> anyhow::Result<u64> {
            Ok(self.quotes.lock().unwrap().len() as u64)
        }
    }
}
