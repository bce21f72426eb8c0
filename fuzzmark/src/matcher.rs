//! Multi-term matcher
//!
//! Places the query terms one after another on document words, walking the
//! merged postings of each term's grams. Every candidate placement of a term
//! is scored by word similarity and distance from the cursor, and the best
//! full alignment wins.
//!
//! Scoring per placed term: `cursor − order − (1 − similarity)·10`, summed over
//! the chain. Earlier and exact placements score higher; scores are only
//! comparable between documents searched with the same query.

use crate::access::IndexSource;
use crate::automaton::Automaton;
use crate::config::{edit_budget, FindOptions, SeekOptions};
use crate::interface::{Mark, MatchResult, SeekError, SeekResult};
use crate::merge::merge;
use crate::tokenizer::ngrams;
use tokio_util::sync::CancellationToken;

/// Score lost per unit of dissimilarity.
const FUZZY_PENALTY: f64 = 10.0;

/// Outcome of placing terms `i..` from some cursor.
enum Placement {
    /// No terms left to place.
    Complete,
    Placed { score: f64, marks: Vec<Mark> },
    /// Term `i` has no usable position.
    Unplaced,
}

pub(crate) struct Matcher<'a> {
    source: IndexSource<'a>,
    terms: &'a [String],
    threshold: f64,
    gram_size: usize,
    exact: bool,
    consecutive: bool,
    cancel: Option<&'a CancellationToken>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(
        source: IndexSource<'a>,
        terms: &'a [String],
        options: &SeekOptions,
        find: &FindOptions,
        cancel: Option<&'a CancellationToken>,
    ) -> Self {
        Self {
            source,
            terms,
            threshold: options.similarity,
            gram_size: options.ngram,
            exact: find.exact,
            consecutive: find.consecutive,
            cancel,
        }
    }

    pub(crate) fn run(mut self) -> SeekResult<MatchResult> {
        match self.search(0, -1, -1)? {
            Placement::Placed { score, marks } => Ok(MatchResult { score, marks }),
            Placement::Complete | Placement::Unplaced => Ok(MatchResult::no_match()),
        }
    }

    fn search(&mut self, i: usize, cursor: i64, anchor: i64) -> SeekResult<Placement> {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(SeekError::Cancelled);
        }
        let terms = self.terms;
        let Some(term) = terms.get(i) else {
            return Ok(Placement::Complete);
        };

        let len = term.chars().count();
        let budget = edit_budget(len, self.threshold);
        let min_order = usize::try_from(cursor).unwrap_or(0);

        let mut candidates = Vec::new();
        let mut intersections = 0i64;
        for gram in ngrams(term, self.gram_size) {
            let postings = self.source.get(&gram)?;
            let (merged, intersected) = merge(&candidates, postings, min_order);
            candidates = merged;
            intersections += i64::from(intersected);
        }

        // Too few shared grams to stay within the edit budget.
        if candidates.is_empty() || len as i64 - self.gram_size as i64 - intersections > budget as i64 {
            tracing::trace!(term = %term, candidates = candidates.len(), intersections, budget, "term rejected");
            return Ok(Placement::Unplaced);
        }

        let automaton = Automaton::new(term, budget);
        let mut best: Option<(f64, Vec<Mark>)> = None;

        for posting in &candidates {
            let order = posting.order as i64;
            if self.consecutive && i > 0 && order > anchor + i as i64 {
                break;
            }

            let similarity = if posting.word.as_ref() == term.as_str() {
                1.0
            } else if self.exact {
                0.0
            } else {
                automaton.similarity(&posting.word)
            };
            if similarity < self.threshold {
                continue;
            }

            let next_anchor = if i == 0 { order } else { anchor };
            let (rest_score, rest_marks) = match self.search(i + 1, order + 1, next_anchor)? {
                Placement::Unplaced => continue,
                Placement::Complete => (0.0, Vec::new()),
                Placement::Placed { score, marks } => (score, marks),
            };

            let score = (cursor - order) as f64 - (1.0 - similarity) * FUZZY_PENALTY + rest_score;
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                let mut marks = Vec::with_capacity(rest_marks.len() + 1);
                marks.push(posting.mark());
                marks.extend(rest_marks);
                best = Some((score, marks));
            }
        }

        Ok(match best {
            Some((score, marks)) => Placement::Placed { score, marks },
            None => Placement::Unplaced,
        })
    }
}
