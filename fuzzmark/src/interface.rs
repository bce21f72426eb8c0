//! Fuzzmark public types
//!
//! Shared records passed between the indexer, the hooks, the matcher and
//! callers, plus the crate error type.

use crate::database::DatabaseError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS
// ═══════════════════════════════════════════════════════════════════════════════

/// One occurrence of a normalized word in a document.
///
/// `order` counts kept words only; `start` and `len` are measured in chars of
/// the original (pre-normalization) text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub order: usize,
    pub word: Arc<str>,
    pub start: usize,
    pub len: usize,
}

impl Posting {
    pub fn new(order: usize, word: impl Into<Arc<str>>, start: usize, len: usize) -> Self {
        Self {
            order,
            word: word.into(),
            start,
            len,
        }
    }

    /// Highlight span of this occurrence in the original text.
    pub fn mark(&self) -> Mark {
        Mark {
            start: self.start,
            len: self.len,
        }
    }
}

/// N-gram key to ascending posting list for one document.
///
/// Immutable once built; every list is strictly ascending by `order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentIndex {
    grams: HashMap<String, Vec<Posting>>,
}

impl DocumentIndex {
    /// Postings under `key`, empty when the key is absent.
    pub fn postings(&self, key: &str) -> &[Posting] {
        self.grams.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.grams.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.grams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.grams.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.grams.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Append a posting under `key`, keeping the list strictly ascending by `order`.
    pub(crate) fn push(&mut self, key: String, posting: Posting) {
        let list = self.grams.entry(key).or_default();
        if list.last().map_or(true, |last| last.order < posting.order) {
            list.push(posting);
        }
    }
}

impl FromIterator<(String, Vec<Posting>)> for DocumentIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Posting>)>>(iter: I) -> Self {
        Self {
            grams: iter.into_iter().collect(),
        }
    }
}

/// Highlight span (char offset and char length) of one matched query term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub start: usize,
    pub len: usize,
}

/// Best alignment of the query terms inside one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: f64,
    /// One mark per query term, in term order.
    pub marks: Vec<Mark>,
}

impl MatchResult {
    /// Score reported when no alignment exists.
    pub const NO_MATCH_SCORE: f64 = -2_000_000.0;

    pub fn no_match() -> Self {
        Self {
            score: Self::NO_MATCH_SCORE,
            marks: Vec::new(),
        }
    }

    pub fn is_match(&self) -> bool {
        !self.marks.is_empty()
    }
}

/// One ranked entry returned by `find`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Raw text for single-text searches, the document id otherwise.
    pub document: String,
    pub query: String,
    pub score: f64,
    pub marks: Vec<Mark>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Error returned from a caller-supplied hook.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

pub type HookResult<T> = Result<T, HookError>;

#[derive(Error, Debug)]
pub enum SeekError {
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: HookError,
    },
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Search worker failed: {0}")]
    Join(String),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl SeekError {
    pub(crate) fn hook(hook: &'static str) -> impl FnOnce(HookError) -> SeekError {
        move |source| SeekError::Hook { hook, source }
    }
}

pub type SeekResult<T> = Result<T, SeekError>;
