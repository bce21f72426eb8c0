//! Caller-supplied collaborators.
//!
//! Word filtering/normalization and index persistence are pluggable. Every
//! method has a default, so an empty `impl` gives the built-in behavior.

use crate::interface::{DocumentIndex, HookResult, Posting};
use crate::normalize::normalize;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Word filter and normalizer applied identically to documents and queries.
pub trait WordHooks: Send + Sync {
    /// Return `false` to drop `word` entirely.
    fn filter_word(&self, _word: &str, _locale: Option<&str>) -> HookResult<bool> {
        Ok(true)
    }

    fn normalize_word(&self, word: &str, locale: Option<&str>) -> HookResult<String> {
        Ok(normalize(word, locale))
    }
}

/// Accept every word, lowercase and accent-fold it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWordHooks;

impl WordHooks for DefaultWordHooks {}

/// Answer from `IndexStore::read_index`.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexRead {
    /// Postings for the requested key only.
    PerKey(Vec<Posting>),
    /// The complete index of the document; no further reads are issued.
    Whole(DocumentIndex),
}

/// External persistence for document indexes.
pub trait IndexStore: Send + Sync {
    /// Fetch postings for `key` of `document`, or `None` when unknown.
    fn read_index(
        &self,
        _document: &str,
        _key: &str,
        _locale: Option<&str>,
    ) -> HookResult<Option<IndexRead>> {
        Ok(None)
    }

    /// Called once after a document with an id has been indexed.
    fn store_index(
        &self,
        _document: &str,
        _index: &DocumentIndex,
        _locale: Option<&str>,
    ) -> HookResult<()> {
        Ok(())
    }
}

/// Store that keeps nothing and knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStore;

impl IndexStore for NoStore {}

/// In-process `IndexStore` keyed by document id.
///
/// Locale is not part of the key. With `serve_whole` set, the first read of a
/// document hands over its complete index.
#[derive(Debug, Default)]
pub struct MemoryStore {
    indexes: RwLock<HashMap<String, DocumentIndex>>,
    serve_whole: bool,
    reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serving_whole() -> Self {
        Self {
            serve_whole: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, document: impl Into<String>, index: DocumentIndex) {
        self.indexes.write().insert(document.into(), index);
    }

    pub fn get(&self, document: &str) -> Option<DocumentIndex> {
        self.indexes.read().get(document).cloned()
    }

    pub fn documents(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.indexes.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of `read_index` calls served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }
}

impl IndexStore for MemoryStore {
    fn read_index(
        &self,
        document: &str,
        key: &str,
        _locale: Option<&str>,
    ) -> HookResult<Option<IndexRead>> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let indexes = self.indexes.read();
        let Some(index) = indexes.get(document) else {
            return Ok(None);
        };
        if self.serve_whole {
            Ok(Some(IndexRead::Whole(index.clone())))
        } else {
            Ok(Some(IndexRead::PerKey(index.postings(key).to_vec())))
        }
    }

    fn store_index(
        &self,
        document: &str,
        index: &DocumentIndex,
        _locale: Option<&str>,
    ) -> HookResult<()> {
        self.insert(document, index.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> DocumentIndex {
        vec![
            ("ab".to_string(), vec![Posting::new(0, "ab", 0, 2)]),
            ("bc".to_string(), vec![Posting::new(1, "bc", 3, 2)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_default_hooks() {
        let hooks = DefaultWordHooks;
        assert!(hooks.filter_word("anything", None).unwrap());
        assert_eq!(hooks.normalize_word("Été", None).unwrap(), "ete");
    }

    #[test]
    fn test_no_store_reads_nothing() {
        assert_eq!(NoStore.read_index("doc", "ab", None).unwrap(), None);
        assert!(NoStore.store_index("doc", &sample_index(), None).is_ok());
    }

    #[test]
    fn test_memory_store_per_key() {
        let store = MemoryStore::new();
        store.store_index("doc", &sample_index(), None).unwrap();

        let read = store.read_index("doc", "bc", None).unwrap();
        assert_eq!(read, Some(IndexRead::PerKey(vec![Posting::new(1, "bc", 3, 2)])));
        let missing = store.read_index("doc", "zz", None).unwrap();
        assert_eq!(missing, Some(IndexRead::PerKey(Vec::new())));
        assert_eq!(store.read_index("other", "ab", None).unwrap(), None);
        assert_eq!(store.reads(), 3);
    }

    #[test]
    fn test_memory_store_whole() {
        let store = MemoryStore::serving_whole();
        store.insert("doc", sample_index());
        let read = store.read_index("doc", "ab", None).unwrap();
        assert_eq!(read, Some(IndexRead::Whole(sample_index())));
        assert_eq!(store.documents(), vec!["doc".to_string()]);
    }
}
