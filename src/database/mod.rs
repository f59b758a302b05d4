//! Database module exports.

mod models;
mod mongo;
mod repository;

pub use mongo::{Database, MongoSettings};
pub use repository::MongoQuoteStore;
