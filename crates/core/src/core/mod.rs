//! Core BPE data structures.
//!
//! Everything here is independent of how the model was produced: the
//! trainer builds these values and the encoder/decoder only read them.

pub mod merges;
pub mod model;
pub mod special;
pub mod vocab;

pub use merges::{MergeMap, MergeRule, MergeRules, Pair};
pub use model::{Merge, VocabularyModel};
pub use special::{SpecialTokens, DEFAULT_UNKNOWN_TOKEN};
pub use vocab::{Vocab, VocabR, Vocabulary, INVALID_TOKEN_ID};
