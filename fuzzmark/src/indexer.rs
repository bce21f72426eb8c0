//! N-gram positional indexer
//!
//! Turns raw text into a `DocumentIndex`: every kept word gets the next
//! sequential order and one posting under each distinct gram of its
//! normalized form.

use crate::hooks::WordHooks;
use crate::interface::{DocumentIndex, Posting, SeekError, SeekResult};
use crate::tokenizer::{ngrams, split_words};
use std::sync::Arc;

pub(crate) fn build_index(
    text: &str,
    gram_size: usize,
    hooks: &dyn WordHooks,
    locale: Option<&str>,
) -> SeekResult<DocumentIndex> {
    let mut index = DocumentIndex::default();
    let mut order = 0;

    for raw in split_words(text) {
        if !hooks
            .filter_word(&raw.text, locale)
            .map_err(SeekError::hook("filter_word"))?
        {
            continue;
        }
        let word: Arc<str> = hooks
            .normalize_word(&raw.text, locale)
            .map_err(SeekError::hook("normalize_word"))?
            .into();

        for gram in ngrams(&word, gram_size) {
            index.push(
                gram,
                Posting {
                    order,
                    word: Arc::clone(&word),
                    start: raw.start,
                    len: raw.len,
                },
            );
        }
        order += 1;
    }

    tracing::debug!(grams = index.len(), words = order, "built document index");
    Ok(index)
}
