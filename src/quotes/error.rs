//! Quote domain errors.

use thiserror::Error;

/// Errors raised by the quote core.
///
/// "Not found" is deliberately absent: lookups return `Option` and the
/// command layer turns a miss into a reply.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Every id in `Q000`..`Q999` is taken.
    #[error("no free quote id left ({stored} quotes stored)")]
    IdSpaceExhausted { stored: usize },

    /// Every free id picked was claimed by a concurrent add first.
    #[error("quote id still contended after {attempts} attempts")]
    IdContention { attempts: usize },

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type QuoteResult<T> = Result<T, QuoteError>;
