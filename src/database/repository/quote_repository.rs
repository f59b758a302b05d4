//! MongoDB-backed quote store.
//!
//! One document per quote, keyed by quote id. No caching: every call is a
//! single round trip so all handlers see live data.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use mongodb::bson::doc;
use mongodb::error::{Error as MongoError, ErrorKind, WriteError, WriteFailure};
use mongodb::options::{IndexOptions, ReplaceOptions};
use mongodb::{Collection, IndexModel};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::database::Database;
use crate::database::models::DbQuote;
use crate::quotes::{Quote, QuoteId, QuoteStore};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError { code: DUPLICATE_KEY, .. }))
    )
}

/// Quote store over a MongoDB collection.
pub struct MongoQuoteStore {
    db: Arc<Database>,
    collection_name: String,
    collection: OnceCell<Collection<DbQuote>>,
}

impl MongoQuoteStore {
    pub fn new(db: Arc<Database>, collection_name: impl Into<String>) -> Self {
        Self {
            db,
            collection_name: collection_name.into(),
            collection: OnceCell::new(),
        }
    }

    /// Collection handle; connects and ensures the key index on first use.
    async fn collection(&self) -> Result<&Collection<DbQuote>> {
        self.collection
            .get_or_try_init(|| async {
                let collection: Collection<DbQuote> =
                    self.db.collection(&self.collection_name).await?;

                let index = IndexModel::builder()
                    .keys(doc! { "key": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build();
                collection.create_index(index).await?;

                info!("Quote collection '{}' ready", self.collection_name);
                Ok::<_, anyhow::Error>(collection)
            })
            .await
    }
}

#[async_trait]
impl QuoteStore for MongoQuoteStore {
    async fn insert(&self, quote: &Quote) -> Result<bool> {
        // The unique index on `key` rejects a second insert of the same id
        match self
            .collection()
            .await?
            .insert_one(DbQuote::from(quote))
            .await
        {
            Ok(_) => {
                debug!("Inserted quote {}", quote.id);
                Ok(true)
            }
            Err(e) if is_duplicate_key(&e) => {
                debug!("Quote id {} already taken", quote.id);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, quote: &Quote) -> Result<()> {
        let filter = doc! { "key": quote.id.as_str() };
        let options = ReplaceOptions::builder().upsert(true).build();

        self.collection()
            .await?
            .replace_one(filter, DbQuote::from(quote))
            .with_options(options)
            .await?;

        debug!("Saved quote {}", quote.id);
        Ok(())
    }

    async fn get(&self, id: &QuoteId) -> Result<Option<String>> {
        let filter = doc! { "key": id.as_str() };
        let result = self.collection().await?.find_one(filter).await?;
        Ok(result.map(|doc| doc.value))
    }

    async fn delete(&self, id: &QuoteId) -> Result<bool> {
        let filter = doc! { "key": id.as_str() };
        let result = self.collection().await?.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_all(&self) -> Result<Vec<Quote>> {
        let mut cursor = self.collection().await?.find(doc! {}).await?;
        let mut quotes = Vec::new();

        while let Some(result) = cursor.next().await {
            quotes.push(Quote::from(result?));
        }

        debug!("Loaded {} quotes", quotes.len());
        Ok(quotes)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection().await?.count_documents(doc! {}).await?)
    }
}
