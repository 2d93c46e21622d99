//! subword-training - BPE training infrastructure
//!
//! This crate learns a [`VocabularyModel`](subword_core::VocabularyModel)
//! from raw text: special tokens first, then the base alphabet, then one
//! merge per iteration until the target size is reached.
//!
//! # Features
//!
//! - Two pair counting strategies with identical output: a full rescan and an
//!   incremental pair index with a lazy 8-ary heap
//! - Deterministic tie-breaking on first occurrence in the corpus
//! - Builder-style configuration, validated before any text is read
//!
//! # Example
//!
//! ```rust
//! use subword_core::SplitConfig;
//! use subword_training::{BpeTrainer, TrainingConfig};
//!
//! let config = TrainingConfig::builder()
//!     .vocab_size(20)
//!     .special_tokens(["<UNK>"])
//!     .split(SplitConfig::new(r"\w+", "g"))
//!     .build()
//!     .unwrap();
//!
//! let model = BpeTrainer::new(config).train("low lower lowest").unwrap();
//! assert_eq!(model.get_id("<UNK>"), Some(0));
//! assert!(model.get_id("low").is_some());
//! ```

pub use subword_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{
    BpeTrainer, PairCounter, TrainedWord, TrainingConfig, TrainingConfigBuilder, TrainingOutcome,
    TrainingStrategy,
};
