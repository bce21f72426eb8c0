//! Query orchestration
//!
//! `Seeker` turns a query into normalized terms with the same word hooks used
//! for indexing, runs the matcher against one text or a collection of stored
//! documents, and ranks the results by score.

use crate::access::IndexSource;
use crate::config::{FindOptions, SeekOptions};
use crate::hooks::{DefaultWordHooks, IndexStore, NoStore, WordHooks};
use crate::indexer::build_index;
use crate::interface::{DocumentIndex, Mark, MatchResult, SearchHit, SeekError, SeekResult};
use crate::matcher::Matcher;
use crate::tokenizer::split_words;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Fuzzy full-text matcher with pluggable word hooks and index store.
#[derive(Clone)]
pub struct Seeker {
    options: SeekOptions,
    words: Arc<dyn WordHooks>,
    store: Arc<dyn IndexStore>,
}

impl Seeker {
    /// Validates `options` once; searches never re-check them.
    pub fn new(options: SeekOptions) -> SeekResult<Self> {
        options.validate()?;
        Ok(Self {
            options,
            words: Arc::new(DefaultWordHooks),
            store: Arc::new(NoStore),
        })
    }

    pub fn with_word_hooks(mut self, hooks: impl WordHooks + 'static) -> Self {
        self.words = Arc::new(hooks);
        self
    }

    pub fn with_store(self, store: impl IndexStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Share one store between several seekers or with the caller.
    pub fn with_shared_store(mut self, store: Arc<dyn IndexStore>) -> Self {
        self.store = store;
        self
    }

    pub fn options(&self) -> &SeekOptions {
        &self.options
    }

    /// Build the index of `text`; with a `document_id` it is also handed to the
    /// store.
    pub fn index(&self, text: &str, document_id: Option<&str>, locale: Option<&str>) -> SeekResult<DocumentIndex> {
        let index = build_index(text, self.options.ngram, self.words.as_ref(), locale)?;
        // An empty id names no document.
        if let Some(id) = document_id.filter(|id| !id.is_empty()) {
            self.store
                .store_index(id, &index, locale)
                .map_err(SeekError::hook("store_index"))?;
            tracing::debug!(document = id, grams = index.len(), "stored document index");
        }
        Ok(index)
    }

    /// Filtered, normalized query words in query order.
    pub fn query_terms(&self, query: &str, locale: Option<&str>) -> SeekResult<Vec<String>> {
        let mut terms = Vec::new();
        for raw in split_words(query) {
            if !self
                .words
                .filter_word(&raw.text, locale)
                .map_err(SeekError::hook("filter_word"))?
            {
                continue;
            }
            terms.push(
                self.words
                    .normalize_word(&raw.text, locale)
                    .map_err(SeekError::hook("normalize_word"))?,
            );
        }
        Ok(terms)
    }

    /// Best alignment of `terms` in an index held in memory.
    pub fn match_index(&self, index: &DocumentIndex, terms: &[String], options: &FindOptions) -> SeekResult<MatchResult> {
        self.run_matcher(IndexSource::direct(index), terms, options, None)
    }

    /// Best alignment of `terms` in a document whose postings come from the store.
    pub fn match_stored(&self, document: &str, terms: &[String], options: &FindOptions) -> SeekResult<MatchResult> {
        self.match_stored_cancellable(document, terms, options, None)
    }

    fn match_stored_cancellable(
        &self,
        document: &str,
        terms: &[String],
        options: &FindOptions,
        cancel: Option<&CancellationToken>,
    ) -> SeekResult<MatchResult> {
        let source = IndexSource::lazy(document, self.store.as_ref(), options.locale_str());
        self.run_matcher(source, terms, options, cancel)
    }

    fn run_matcher(
        &self,
        source: IndexSource<'_>,
        terms: &[String],
        options: &FindOptions,
        cancel: Option<&CancellationToken>,
    ) -> SeekResult<MatchResult> {
        if terms.is_empty() {
            return Ok(MatchResult::no_match());
        }
        Matcher::new(source, terms, &self.options, options, cancel).run()
    }

    /// Index `text` on the fly and match `query` against it.
    pub fn find_text(&self, text: &str, query: &str, options: &FindOptions) -> SeekResult<Vec<SearchHit>> {
        self.find_text_inner(text, query, options, None)
    }

    /// Like [`Seeker::find_text`], aborting with [`SeekError::Cancelled`] once
    /// `token` is cancelled.
    pub fn find_text_cancellable(
        &self,
        text: &str,
        query: &str,
        options: &FindOptions,
        token: &CancellationToken,
    ) -> SeekResult<Vec<SearchHit>> {
        self.find_text_inner(text, query, options, Some(token))
    }

    fn find_text_inner(
        &self,
        text: &str,
        query: &str,
        options: &FindOptions,
        cancel: Option<&CancellationToken>,
    ) -> SeekResult<Vec<SearchHit>> {
        let terms = self.query_terms(query, options.locale_str())?;
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let index = build_index(text, self.options.ngram, self.words.as_ref(), options.locale_str())?;
        let result = self.run_matcher(IndexSource::direct(&index), &terms, options, cancel)?;

        let mut hits = Vec::with_capacity(1);
        if keep(&result, options) {
            hits.push(SearchHit {
                document: text.to_string(),
                query: query.to_string(),
                score: result.score,
                marks: result.marks,
            });
        }
        Ok(hits)
    }

    /// Match `query` against stored documents, best first.
    pub fn find<S: AsRef<str> + Sync>(&self, documents: &[S], query: &str, options: &FindOptions) -> SeekResult<Vec<SearchHit>> {
        self.find_inner(documents, query, options, None)
    }

    /// Like [`Seeker::find`], aborting with [`SeekError::Cancelled`] once `token`
    /// is cancelled.
    pub fn find_cancellable<S: AsRef<str> + Sync>(
        &self,
        documents: &[S],
        query: &str,
        options: &FindOptions,
        token: &CancellationToken,
    ) -> SeekResult<Vec<SearchHit>> {
        self.find_inner(documents, query, options, Some(token))
    }

    fn find_inner<S: AsRef<str> + Sync>(
        &self,
        documents: &[S],
        query: &str,
        options: &FindOptions,
        cancel: Option<&CancellationToken>,
    ) -> SeekResult<Vec<SearchHit>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let terms = self.query_terms(query, options.locale_str())?;
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        // Indexed parallel iterator: results come back in input order.
        use rayon::prelude::*;
        let results = documents
            .par_iter()
            .map(|document| {
                let document = document.as_ref();
                self.match_stored_cancellable(document, &terms, options, cancel)
                    .map(|result| (document, result))
            })
            .collect::<SeekResult<Vec<_>>>()?;

        let mut hits: Vec<SearchHit> = results
            .into_iter()
            .filter(|(_, result)| keep(result, options))
            .map(|(document, result)| SearchHit {
                document: document.to_string(),
                query: query.to_string(),
                score: result.score,
                marks: result.marks,
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));

        tracing::debug!(documents = documents.len(), hits = hits.len(), terms = terms.len(), "search finished");
        Ok(hits)
    }
}

fn keep(result: &MatchResult, options: &FindOptions) -> bool {
    !options.matched_only || result.is_match()
}

/// Wrap every marked span of `text` in `open`/`close`. Marks are char spans
/// and may come in any order; overlapping or out-of-range marks are skipped.
pub fn render_marks(text: &str, marks: &[Mark], open: &str, close: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut sorted: Vec<Mark> = marks.to_vec();
    sorted.sort_unstable_by_key(|m| m.start);

    let mut out = String::with_capacity(text.len() + marks.len() * (open.len() + close.len()));
    let mut pos = 0;
    for mark in sorted {
        let end = mark.start + mark.len;
        if mark.start < pos || end > chars.len() {
            continue;
        }
        out.extend(&chars[pos..mark.start]);
        out.push_str(open);
        out.extend(&chars[mark.start..end]);
        out.push_str(close);
        pos = end;
    }
    out.extend(&chars[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::MemoryStore;
    use crate::interface::HookResult;

    struct StopWords;

    impl WordHooks for StopWords {
        fn filter_word(&self, word: &str, _locale: Option<&str>) -> HookResult<bool> {
            Ok(!matches!(word.to_lowercase().as_str(), "the" | "a" | "of"))
        }
    }

    fn seeker() -> Seeker {
        Seeker::new(SeekOptions::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_options() {
        assert!(matches!(
            Seeker::new(SeekOptions::default().with_ngram(0)),
            Err(SeekError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_query_terms() {
        let terms = seeker().query_terms("  Quick, brown-FOX!  ", None).unwrap();
        assert_eq!(terms, vec!["quick", "brown", "fox"]);
        assert!(seeker().query_terms(" ?! ", None).unwrap().is_empty());
    }

    #[test]
    fn test_query_terms_filtered() {
        let seeker = seeker().with_word_hooks(StopWords);
        assert_eq!(seeker.query_terms("the art of war", None).unwrap(), vec!["art", "war"]);
    }

    #[test]
    fn test_find_text_round_trip() {
        let text = "Le client est très important merci";
        let hits = seeker().find_text(text, "très", &FindOptions::default().exact(true)).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].marks, vec![Mark { start: 14, len: 4 }]);
        assert_eq!(hits[0].document, text);
        let marked: String = text.chars().skip(14).take(4).collect();
        assert_eq!(marked, "très");
    }

    #[test]
    fn test_find_text_empty_query() {
        assert!(seeker().find_text("some text", "...", &FindOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_find_text_keeps_non_match_unless_filtered() {
        let hits = seeker().find_text("some text", "absent", &FindOptions::default()).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, MatchResult::NO_MATCH_SCORE);

        let hits = seeker()
            .find_text("some text", "absent", &FindOptions::default().matched_only(true))
            .unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_index_hands_to_store() {
        let store = Arc::new(MemoryStore::new());
        let seeker = seeker().with_shared_store(store.clone());
        let index = seeker.index("hello world", Some("greeting"), None).unwrap();
        assert_eq!(store.get("greeting"), Some(index));

        seeker.index("no id", None, None).unwrap();
        seeker.index("empty id", Some(""), None).unwrap();
        assert_eq!(store.documents(), vec!["greeting".to_string()]);
    }

    #[test]
    fn test_find_ranks_stored_documents() {
        let store = Arc::new(MemoryStore::new());
        let seeker = seeker().with_shared_store(store.clone());
        seeker.index("a quick brown fox", Some("fuzzy"), None).unwrap();
        seeker.index("the quick brown fox", Some("verbatim"), None).unwrap();
        seeker.index("nothing relevant here", Some("miss"), None).unwrap();

        let hits = seeker.find(&["miss", "fuzzy", "verbatim"], "quick brwn", &FindOptions::default()).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[2].document, "miss");
        assert_eq!(hits[2].score, MatchResult::NO_MATCH_SCORE);
        assert_eq!(hits[0].marks.len(), 2);
    }

    #[test]
    fn test_find_no_documents() {
        let docs: [&str; 0] = [];
        assert!(seeker().find(&docs, "query", &FindOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_find_cancelled() {
        let store = Arc::new(MemoryStore::new());
        let seeker = seeker().with_shared_store(store.clone());
        seeker.index("hello world", Some("doc"), None).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let err = seeker
            .find_cancellable(&["doc"], "hello", &FindOptions::default(), &token)
            .unwrap_err();
        assert!(matches!(err, SeekError::Cancelled));
    }

    #[test]
    fn test_find_text_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let err = seeker()
            .find_text_cancellable("hello world", "hello", &FindOptions::default(), &token)
            .unwrap_err();
        assert!(matches!(err, SeekError::Cancelled));

        let live = CancellationToken::new();
        let hits = seeker()
            .find_text_cancellable("hello world", "hello", &FindOptions::default(), &live)
            .unwrap();
        assert_eq!(hits[0].marks, vec![Mark { start: 0, len: 5 }]);
    }

    #[test]
    fn test_render_marks() {
        let text = "the quick brown fox";
        let marks = [Mark { start: 10, len: 5 }, Mark { start: 4, len: 5 }];
        assert_eq!(render_marks(text, &marks, "**", "**"), "the **quick** **brown** fox");
        assert_eq!(render_marks("été", &[Mark { start: 1, len: 1 }], "[", "]"), "é[t]é");
        assert_eq!(render_marks("abc", &[Mark { start: 2, len: 5 }], "[", "]"), "abc");
    }
}
