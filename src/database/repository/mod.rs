//! Repository module - MongoDB implementations of the data access traits.

mod quote_repository;

pub use quote_repository::MongoQuoteStore;
