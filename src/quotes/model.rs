//! Quote models.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prefix every quote id starts with.
pub const ID_PREFIX: char = 'Q';

/// Number of characters following the prefix.
pub const ID_SUFFIX_LEN: usize = 3;

/// Number of distinct generated ids (`Q000`..`Q999`).
pub const ID_SPACE: u32 = 1000;

/// Quote identifier, `Q` followed by three characters.
///
/// Generated ids always use decimal digits. Ids typed by users only need
/// the prefix and three characters of any kind, so `Qabc` is a valid (if
/// never stored) id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    /// Parse an id typed by a user.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut chars = raw.chars();
        if chars.next() != Some(ID_PREFIX) {
            return None;
        }
        if chars.count() != ID_SUFFIX_LEN {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Id for the given slot in `0..ID_SPACE`.
    pub fn from_slot(slot: u32) -> Self {
        Self(format!("{}{:03}", ID_PREFIX, slot % ID_SPACE))
    }

    /// Draw a random candidate id. Uniqueness is the repository's job.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_slot(rng.gen_range(0..ID_SPACE))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
}

impl Quote {
    pub fn new(id: QuoteId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.text)
    }
}
