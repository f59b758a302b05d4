//! Quote model for the quotes collection.

use serde::{Deserialize, Serialize};

use crate::quotes::{Quote, QuoteId};

/// A single quote document: `{ key: "Q123", value: "text" }`.
///
/// `_id` is left to MongoDB and ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbQuote {
    /// Quote id (unique index)
    pub key: QuoteId,

    /// Quote text
    pub value: String,
}

impl From<&Quote> for DbQuote {
    fn from(quote: &Quote) -> Self {
        Self {
            key: quote.id.clone(),
            value: quote.text.clone(),
        }
    }
}

impl From<DbQuote> for Quote {
    fn from(doc: DbQuote) -> Self {
        Quote::new(doc.key, doc.value)
    }
}
