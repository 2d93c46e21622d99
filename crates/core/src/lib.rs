//! subword-core - Vocabulary model and pattern splitter
//!
//! This crate provides the data structures shared by training, encoding and
//! decoding: the [`Splitter`] that cuts raw text into pre-tokens, and the
//! immutable [`VocabularyModel`] (vocabulary, ranked merges, special tokens
//! and the split rule it was trained with).
//!
//! # Features
//!
//! - Dense token ids with `AHashMap` lookup and compact strings
//! - Rank-ordered merge rules with constant-time pair lookup
//! - Regex splitting with an automatic fallback to `fancy-regex` for
//!   look-around and backreferences
//!
//! # Example
//!
//! ```rust
//! use subword_core::SplitConfig;
//!
//! let splitter = SplitConfig::new(r"\w+|[^\w\s]+", "g").compile().unwrap();
//! let words = splitter.split_words("Hello, world!");
//! assert_eq!(words, vec!["Hello", ",", "world", "!"]);
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

pub mod split;
pub use split::{split, PatternOptions, PreToken, SpanMatcher, SplitConfig, Splitter};

pub mod core;
pub use core::{
    Merge, MergeMap, MergeRule, MergeRules, Pair, SpecialTokens, Vocab, VocabR, Vocabulary,
    VocabularyModel, DEFAULT_UNKNOWN_TOKEN, INVALID_TOKEN_ID,
};
