//! Training infrastructure for BPE tokenizers.
//!
//! This module provides the training algorithms and utilities for
//! learning BPE merge rules from text data.

pub mod config;
pub mod counter;
pub mod pair_index;
pub mod queue;
pub mod trainer;

pub use config::{TrainingConfig, TrainingConfigBuilder, TrainingStrategy};
pub use counter::PairCounter;
pub use pair_index::{Occurrence, PairIndex, PairStats};
pub use queue::{MergeCandidate, PairPriorityQueue};
pub use trainer::{BpeTrainer, TrainedWord, TrainingOutcome};
