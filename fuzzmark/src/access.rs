//! Index access for one search.
//!
//! A search reads postings either straight from an index in memory or, when
//! only a document id is known, through `IndexStore::read_index` with a
//! per-key cache. A store that answers with a whole index flips the source to
//! direct access for the rest of the search.

use crate::hooks::{IndexRead, IndexStore};
use crate::interface::{DocumentIndex, Posting, SeekError, SeekResult};
use std::borrow::Cow;
use std::collections::HashMap;

enum Access<'a> {
    Direct(Cow<'a, DocumentIndex>),
    Lazy {
        document: &'a str,
        store: &'a dyn IndexStore,
        cache: HashMap<String, Vec<Posting>>,
    },
}

pub(crate) struct IndexSource<'a> {
    access: Access<'a>,
    locale: Option<&'a str>,
}

impl<'a> IndexSource<'a> {
    pub(crate) fn direct(index: &'a DocumentIndex) -> Self {
        Self {
            access: Access::Direct(Cow::Borrowed(index)),
            locale: None,
        }
    }

    pub(crate) fn lazy(document: &'a str, store: &'a dyn IndexStore, locale: Option<&'a str>) -> Self {
        Self {
            access: Access::Lazy {
                document,
                store,
                cache: HashMap::new(),
            },
            locale,
        }
    }

    pub(crate) fn is_direct(&self) -> bool {
        matches!(self.access, Access::Direct(_))
    }

    /// Postings under `key`; empty when neither the index nor the store has it.
    pub(crate) fn get(&mut self, key: &str) -> SeekResult<&[Posting]> {
        let fetched = match &self.access {
            Access::Lazy { document, store, cache } if !cache.contains_key(key) => Some(
                store
                    .read_index(document, key, self.locale)
                    .map_err(SeekError::hook("read_index"))?,
            ),
            _ => None,
        };

        if let Some(read) = fetched {
            match read {
                Some(IndexRead::Whole(index)) => {
                    tracing::debug!(grams = index.len(), "store returned whole index, switching to direct access");
                    self.access = Access::Direct(Cow::Owned(index));
                }
                Some(IndexRead::PerKey(postings)) => self.cache_postings(key, postings),
                None => self.cache_postings(key, Vec::new()),
            }
        }

        Ok(match &self.access {
            Access::Direct(index) => index.postings(key),
            Access::Lazy { cache, .. } => cache.get(key).map_or(&[], Vec::as_slice),
        })
    }

    fn cache_postings(&mut self, key: &str, postings: Vec<Posting>) {
        if let Access::Lazy { cache, .. } = &mut self.access {
            cache.insert(key.to_string(), postings);
        }
    }
}
