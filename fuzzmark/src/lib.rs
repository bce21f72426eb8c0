//! Fuzzmark - fuzzy full-text matching with highlight marks
//!
//! Documents are indexed by the n-grams of their normalized words. A query is
//! placed term by term on document words, tolerating typos through a bounded
//! Damerau-Levenshtein automaton, optionally requiring adjacent words, and the
//! best alignment is returned with a score and char-offset marks.
//!
//! Indexes can be supplied in memory or fetched lazily per n-gram from an
//! `IndexStore` (see `database` for a SQLite implementation).

pub(crate) mod access;
pub mod automaton;
pub mod config;
pub mod database;
pub mod hooks;
mod indexer;
pub mod interface;
pub(crate) mod matcher;
pub mod merge;
pub mod normalize;
pub mod search;
pub mod service;
pub mod tokenizer;

pub use config::{edit_budget, FindOptions, SeekOptions};
pub use database::IndexDatabase;
pub use hooks::{DefaultWordHooks, IndexRead, IndexStore, MemoryStore, NoStore, WordHooks};
pub use interface::*;
pub use search::{render_marks, Seeker};
pub use service::SeekService;
