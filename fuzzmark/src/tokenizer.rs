//! Delimiter-based word splitting and n-gram extraction.
//!
//! Offsets and lengths are counted in chars of the original text.

/// Punctuation that separates words, in addition to whitespace.
const PUNCTUATION_DELIMITERS: &[char] = &[
    '.', '?', ',', ';', '!', ':', '(', ')', '[', ']', '@', '#', '$', '%', '^', '&', '*', '-', '_',
    '+', '<', '>', '=', '/', '\\', '"', '\'',
];

pub fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || PUNCTUATION_DELIMITERS.contains(&c)
}

/// A maximal run of non-delimiter chars, before filtering and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawWord {
    pub start: usize,
    pub len: usize,
    pub text: String,
}

pub fn split_words(text: &str) -> Vec<RawWord> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut start = 0;
    let mut len = 0;

    for (i, c) in text.chars().enumerate() {
        if is_delimiter(c) {
            if len > 0 {
                words.push(RawWord {
                    start,
                    len,
                    text: std::mem::take(&mut current),
                });
                len = 0;
            }
        } else {
            if len == 0 {
                start = i;
            }
            current.push(c);
            len += 1;
        }
    }
    if len > 0 {
        words.push(RawWord { start, len, text: current });
    }
    words
}

/// Distinct sliding windows of `n` chars, in first-occurrence order.
/// A word shorter than `n` yields itself as its single gram.
pub fn ngrams(word: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = n.max(1);
    if chars.len() <= n {
        return vec![word.to_string()];
    }

    let mut grams: Vec<String> = Vec::with_capacity(chars.len() - n + 1);
    for window in chars.windows(n) {
        let gram: String = window.iter().collect();
        if !grams.contains(&gram) {
            grams.push(gram);
        }
    }
    grams
}
