//! Quote query engine: listing, search, counting and random picks.

use std::sync::Arc;

use rand::seq::SliceRandom;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::error::QuoteResult;
use super::model::Quote;
use super::store::QuoteStore;

/// Sentinel shown when there is nothing to pick from.
pub const NO_QUOTES: &str = "No quotes";

/// Matcher for search filters.
///
/// Filters are case-insensitive regular expressions, so `wor.d` matches
/// "World". A filter that does not compile as a pattern is matched
/// literally instead.
#[derive(Debug, Clone)]
pub enum TextMatcher {
    Pattern(Regex),
    Literal(String),
}

impl TextMatcher {
    pub fn new(filter: &str) -> Self {
        match RegexBuilder::new(filter).case_insensitive(true).build() {
            Ok(re) => Self::Pattern(re),
            Err(e) => {
                debug!("Search filter '{}' is not a valid pattern ({}), matching literally", filter, e);
                Self::Literal(filter.to_lowercase())
            }
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(text),
            Self::Literal(needle) => text.to_lowercase().contains(needle.as_str()),
        }
    }
}

/// Read-side operations over the quote collection.
#[derive(Clone)]
pub struct QuoteQuery {
    store: Arc<dyn QuoteStore>,
}

impl QuoteQuery {
    pub fn new(store: Arc<dyn QuoteStore>) -> Self {
        Self { store }
    }

    /// All quotes, or only those whose text matches `filter`.
    ///
    /// An empty filter behaves like no filter.
    pub async fn list(&self, filter: Option<&str>) -> QuoteResult<Vec<Quote>> {
        let quotes = self.store.find_all().await?;

        let Some(filter) = filter.filter(|f| !f.is_empty()) else {
            return Ok(quotes);
        };

        let matcher = TextMatcher::new(filter);
        let matched: Vec<Quote> = quotes
            .into_iter()
            .filter(|q| matcher.is_match(&q.text))
            .collect();

        debug!("Search '{}' matched {} quotes", filter, matched.len());
        Ok(matched)
    }

    /// A uniformly random quote, `None` when the collection is empty.
    pub async fn random(&self) -> QuoteResult<Option<Quote>> {
        let quotes = self.list(None).await?;
        Ok(quotes.choose(&mut rand::thread_rng()).cloned())
    }

    /// `"<id>: <text>"` for a random quote, or [`NO_QUOTES`].
    pub async fn random_line(&self) -> QuoteResult<String> {
        Ok(self
            .random()
            .await?
            .map(|q| q.to_string())
            .unwrap_or_else(|| NO_QUOTES.to_string()))
    }

    /// Live count from the store.
    pub async fn count(&self) -> QuoteResult<u64> {
        Ok(self.store.count().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::model::QuoteId;
    use crate::quotes::store::MemoryQuoteStore;

    fn quote(slot: u32, text: &str) -> Quote {
        Quote::new(QuoteId::from_slot(slot), text)
    }

    fn sample() -> Vec<Quote> {
        vec![
            quote(1, "Hello World"),
            quote(2, "the world is round"),
            quote(3, "nothing to see"),
            quote(4, "costs $5 (maybe)"),
        ]
    }

    fn query_over(quotes: Vec<Quote>) -> QuoteQuery {
        QuoteQuery::new(Arc::new(MemoryQuoteStore::with_quotes(quotes)))
    }

    #[tokio::test]
    async fn test_list_without_filter_returns_everything() {
        let query = query_over(sample());

        assert_eq!(query.list(None).await.unwrap(), sample());
        assert_eq!(query.list(Some("")).await.unwrap(), sample());
    }

    #[tokio::test]
    async fn test_list_filter_is_case_insensitive() {
        let query = query_over(sample());

        let found = query.list(Some("WORLD")).await.unwrap();

        assert_eq!(found, vec![quote(1, "Hello World"), quote(2, "the world is round")]);
    }

    #[tokio::test]
    async fn test_list_filter_uses_pattern_semantics() {
        let query = query_over(sample());

        let found = query.list(Some("^the w.rld")).await.unwrap();

        assert_eq!(found, vec![quote(2, "the world is round")]);
    }

    #[tokio::test]
    async fn test_invalid_pattern_matches_literally() {
        let query = query_over(sample());

        let found = query.list(Some("(maybe")).await.unwrap();

        assert_eq!(found, vec![quote(4, "costs $5 (maybe)")]);
    }

    #[tokio::test]
    async fn test_list_filter_without_matches_is_empty() {
        let query = query_over(sample());

        assert!(query.list(Some("zebra")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_matches_listing() {
        let empty = query_over(vec![]);
        assert_eq!(empty.count().await.unwrap(), 0);

        let query = query_over(sample());
        let listed = query.list(None).await.unwrap().len() as u64;
        assert_eq!(query.count().await.unwrap(), listed);
    }

    #[tokio::test]
    async fn test_random_on_empty_store() {
        let query = query_over(vec![]);

        assert_eq!(query.random().await.unwrap(), None);
        assert_eq!(query.random_line().await.unwrap(), NO_QUOTES);
    }

    #[tokio::test]
    async fn test_random_returns_stored_quote() {
        let query = query_over(sample());

        for _ in 0..50 {
            let picked = query.random().await.unwrap().unwrap();
            assert!(sample().contains(&picked));
        }
    }

    #[test]
    fn test_literal_matcher() {
        let matcher = TextMatcher::Literal("abc".to_string());
        assert!(matcher.is_match("xxABCxx"));
        assert!(!matcher.is_match("ab c"));
    }
}
