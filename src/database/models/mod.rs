//! Database models.

pub mod db_quote;

pub use db_quote::DbQuote;
