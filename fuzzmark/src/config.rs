//! Search options
//!
//! `SeekOptions` are static for the lifetime of a `Seeker` and validated once
//! when it is built. `FindOptions` carry the per-call switches.

use crate::interface::{SeekError, SeekResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_SIMILARITY: f64 = 0.6;
pub const DEFAULT_NGRAM: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekOptions {
    /// Minimum word similarity (θ) a candidate needs to be accepted.
    pub similarity: f64,
    /// Gram size used both for indexing and for query lookups.
    #[serde(rename = "n-gram")]
    pub ngram: usize,
    /// Reserved; the matcher does not consult it.
    #[serde(rename = "match-prefix")]
    pub match_prefix: bool,
}

impl Default for SeekOptions {
    fn default() -> Self {
        Self {
            similarity: DEFAULT_SIMILARITY,
            ngram: DEFAULT_NGRAM,
            match_prefix: false,
        }
    }
}

impl SeekOptions {
    pub fn from_json(json: &str) -> SeekResult<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| SeekError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> SeekResult<Self> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            SeekError::InvalidOptions(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::from_json(&json)
    }

    pub fn with_similarity(mut self, similarity: f64) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn with_ngram(mut self, ngram: usize) -> Self {
        self.ngram = ngram;
        self
    }

    pub fn validate(&self) -> SeekResult<()> {
        if !(0.0..=1.0).contains(&self.similarity) {
            return Err(SeekError::InvalidOptions(format!(
                "similarity must be within [0, 1], got {}",
                self.similarity
            )));
        }
        if self.ngram == 0 {
            return Err(SeekError::InvalidOptions("n-gram must be at least 1".into()));
        }
        Ok(())
    }

    /// Edit budget for a term of `len` chars under these options.
    pub fn edit_budget(&self, len: usize) -> usize {
        edit_budget(len, self.similarity)
    }
}

/// `round((1 − θ)·len)` clamped to `[0, len]`.
pub fn edit_budget(len: usize, similarity: f64) -> usize {
    let budget = ((1.0 - similarity) * len as f64).round();
    if budget <= 0.0 {
        0
    } else {
        (budget as usize).min(len)
    }
}

/// Per-call switches for `find` and the `match_*` operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindOptions {
    /// Accept verbatim word matches only.
    pub exact: bool,
    /// Require matched terms on adjacent document words.
    pub consecutive: bool,
    pub locale: Option<String>,
    /// Drop documents without any alignment from ranked output.
    pub matched_only: bool,
}

impl FindOptions {
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = exact;
        self
    }

    pub fn consecutive(mut self, consecutive: bool) -> Self {
        self.consecutive = consecutive;
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn matched_only(mut self, matched_only: bool) -> Self {
        self.matched_only = matched_only;
        self
    }

    pub(crate) fn locale_str(&self) -> Option<&str> {
        self.locale.as_deref()
    }
}
