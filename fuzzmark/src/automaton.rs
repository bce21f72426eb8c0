//! Bounded Damerau-Levenshtein automaton.
//!
//! Online, sparse evaluation of the optimal-string-alignment distance between
//! a fixed pattern and a candidate fed one char at a time. Only pattern
//! positions whose distance so far is within the budget are kept, so a step
//! costs O(k) instead of O(n).

/// Snapshot of the active band after some prefix of the candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// Pattern positions in the band, ascending.
    offsets: Vec<usize>,
    /// Distance at each offset, all `<= k`.
    distances: Vec<usize>,
    /// The band one candidate char earlier, for transpositions.
    prev_offsets: Vec<usize>,
    prev_distances: Vec<usize>,
    last: Option<char>,
}

impl State {
    /// No pattern position remains within budget.
    pub fn is_dead(&self) -> bool {
        self.offsets.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Automaton {
    pattern: Vec<char>,
    max_edits: usize,
}

impl Automaton {
    /// `max_edits` is clamped to the pattern length.
    pub fn new(pattern: &str, max_edits: usize) -> Self {
        let pattern: Vec<char> = pattern.chars().collect();
        let max_edits = max_edits.min(pattern.len());
        Self { pattern, max_edits }
    }

    pub fn max_edits(&self) -> usize {
        self.max_edits
    }

    /// Before any input: skipping up to `k` pattern chars costs one edit each.
    pub fn initial(&self) -> State {
        State {
            offsets: (0..=self.max_edits).collect(),
            distances: (0..=self.max_edits).collect(),
            prev_offsets: Vec::new(),
            prev_distances: Vec::new(),
            last: None,
        }
    }

    pub fn transition(&self, state: &State, c: char) -> State {
        let k = self.max_edits;
        let n = self.pattern.len();
        let m = state.offsets.len();
        let mut offsets = Vec::with_capacity(m + 1);
        let mut distances = Vec::with_capacity(m + 1);

        // Position 0 is only reachable by inserting the candidate char.
        if m > 0 && state.offsets[0] == 0 && state.distances[0] < k {
            offsets.push(0);
            distances.push(state.distances[0] + 1);
        }

        let mut back = 0;
        for j in 0..m {
            let i = state.offsets[j];
            if i >= n {
                break;
            }
            let cost = usize::from(self.pattern[i] != c);
            // substitution or match
            let mut d = state.distances[j] + cost;
            let next = i + 1;

            // skip a pattern char
            if offsets.last() == Some(&i) {
                d = d.min(distances[distances.len() - 1] + 1);
            }
            // skip a candidate char
            if j + 1 < m && state.offsets[j + 1] == next {
                d = d.min(state.distances[j + 1] + 1);
            }
            // adjacent transposition
            if next >= 2 && state.last == Some(self.pattern[next - 1]) && c == self.pattern[next - 2] {
                while back < state.prev_offsets.len() && state.prev_offsets[back] < next - 2 {
                    back += 1;
                }
                if back < state.prev_offsets.len() && state.prev_offsets[back] == next - 2 {
                    d = d.min(state.prev_distances[back] + cost);
                    back += 1;
                }
            }

            if d <= k {
                offsets.push(next);
                distances.push(d);
            }
        }

        State {
            offsets,
            distances,
            prev_offsets: state.offsets.clone(),
            prev_distances: state.distances.clone(),
            last: Some(c),
        }
    }

    /// The whole pattern has been consumed within budget.
    pub fn is_terminal(&self, state: &State) -> bool {
        state.offsets.last() == Some(&self.pattern.len())
    }

    /// Distance from the pattern to `word`, or `None` when it exceeds the budget.
    pub fn distance(&self, word: &str) -> Option<usize> {
        let mut state = self.initial();
        for c in word.chars() {
            state = self.transition(&state, c);
            if state.is_dead() {
                return None;
            }
        }
        if self.is_terminal(&state) {
            state.distances.last().copied()
        } else {
            None
        }
    }

    /// `1 − distance/n` when within budget, else `0`.
    pub fn similarity(&self, word: &str) -> f64 {
        match self.distance(word) {
            Some(_) if self.pattern.is_empty() => 1.0,
            Some(d) => 1.0 - d as f64 / self.pattern.len() as f64,
            None => 0.0,
        }
    }
}
