//! Quote repository.
//!
//! CRUD over the backing store. Quote data is never cached here; every call
//! goes to the store so that concurrent edits are always visible.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use super::error::{QuoteError, QuoteResult};
use super::model::{ID_SPACE, Quote, QuoteId};
use super::store::QuoteStore;

/// Random probes before falling back to scanning the collection for a free id.
pub const MAX_RANDOM_ID_ATTEMPTS: usize = 32;

/// Free ids tried before giving up on a contended add.
pub const MAX_INSERT_ATTEMPTS: usize = 8;

/// Repository for quotes.
#[derive(Clone)]
pub struct QuoteRepository {
    store: Arc<dyn QuoteStore>,
}

impl QuoteRepository {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// Store a new quote under a fresh id and return the id.
    ///
    /// The id is claimed with an insert-only write; if a concurrent add got
    /// there first, another free id is picked.
    pub async fn add(&self, text: &str) -> QuoteResult<QuoteId> {
        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let id = self.free_id().await?;
            if self.store.insert(&Quote::new(id.clone(), text)).await? {
                info!("Quote {} added", id);
                return Ok(id);
            }
            debug!("Quote id {} claimed concurrently (attempt {})", id, attempt);
        }

        Err(QuoteError::IdContention {
            attempts: MAX_INSERT_ATTEMPTS,
        })
    }

    /// Get the text of a quote, `None` when the id is unknown.
    pub async fn get(&self, id: &QuoteId) -> QuoteResult<Option<String>> {
        let text = self.store.get(id).await?;
        debug!("DB get quote {}: {}", id, text.is_some());
        Ok(text)
    }

    /// Replace the text of an existing quote.
    ///
    /// Returns `false` without writing anything when the id is unknown.
    pub async fn modify(&self, id: &QuoteId, text: &str) -> QuoteResult<bool> {
        if self.store.get(id).await?.is_none() {
            debug!("Quote {} not found, nothing modified", id);
            return Ok(false);
        }

        self.store.put(&Quote::new(id.clone(), text)).await?;
        info!("Quote {} edited", id);
        Ok(true)
    }

    /// Delete a quote. Unknown ids are not an error.
    pub async fn delete(&self, id: &QuoteId) -> QuoteResult<()> {
        let removed = self.store.delete(id).await?;
        info!("Quote {} deleted: {}", id, removed);
        Ok(())
    }

    /// Find an id not present in the store.
    ///
    /// Random probing first; once the collection is crowded enough that
    /// probes keep colliding, pick uniformly among the ids actually free.
    async fn free_id(&self) -> QuoteResult<QuoteId> {
        for attempt in 1..=MAX_RANDOM_ID_ATTEMPTS {
            let candidate = QuoteId::random(&mut rand::thread_rng());
            if self.store.get(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            debug!("Quote id {} taken (attempt {})", candidate, attempt);
        }

        warn!(
            "No free quote id after {} random attempts, scanning collection",
            MAX_RANDOM_ID_ATTEMPTS
        );

        let taken: HashSet<QuoteId> = self
            .store
            .find_all()
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();

        let free: Vec<QuoteId> = (0..ID_SPACE)
            .map(QuoteId::from_slot)
            .filter(|id| !taken.contains(id))
            .collect();

        free.choose(&mut rand::thread_rng())
            .cloned()
            .ok_or(QuoteError::IdSpaceExhausted {
                stored: taken.len(),
            })
    }
}
