//! Quote core.
//!
//! Storage, querying and id allocation for quotes, independent of Telegram.
//!
//! - `model` - `Quote` and `QuoteId`
//! - `store` - backing store trait
//! - `repository` - create / read / update / delete
//! - `query` - listing, search, count, random pick

mod error;
mod model;
mod query;
mod repository;
mod store;

pub use error::QuoteError;
pub use model::{Quote, QuoteId};
pub use query::QuoteQuery;
pub use repository::QuoteRepository;
pub use store::QuoteStore;

#[cfg(test)]
pub use store::MemoryQuoteStore;

use std::sync::Arc;

/// Repository and query engine over one shared store.
#[derive(Clone)]
pub struct QuoteBook {
    pub repo: QuoteRepository,
    pub query: QuoteQuery,
}

impl QuoteBook {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self {
            query: QuoteQuery::new(store.clone()),
            repo: QuoteRepository::new(store),
        }
    }
}
