//! Training configuration.

use std::fmt;
use std::str::FromStr;

use subword_core::{Result, SplitConfig, TokenizerError};

/// How pair counts are maintained between merges.
///
/// Both strategies learn the same model; they differ only in cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TrainingStrategy {
    /// Recount every adjacent pair of every word after each merge.
    Rescan,
    /// Keep a pair index and only revisit the words a merge touched.
    #[default]
    Incremental,
}

impl FromStr for TrainingStrategy {
    type Err = TokenizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "rescan" => Ok(Self::Rescan),
            "incremental" => Ok(Self::Incremental),
            other => Err(TokenizerError::Config(format!(
                "unknown training strategy {other:?} (expected \"rescan\" or \"incremental\")"
            ))),
        }
    }
}

impl fmt::Display for TrainingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rescan => f.write_str("rescan"),
            Self::Incremental => f.write_str("incremental"),
        }
    }
}

/// Configuration for BPE training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingConfig {
    /// Target vocabulary size, special tokens included
    pub vocab_size: usize,
    /// Reserved tokens, seeded first in this order
    pub special_tokens: Vec<String>,
    /// Pre-tokenization rule, stored in the trained model
    pub split: SplitConfig,
    /// Pair counting strategy
    pub strategy: TrainingStrategy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            vocab_size: 200,
            special_tokens: vec!["<UNK>".into(), "<PAD>".into(), "<EOS>".into()],
            split: SplitConfig::default(),
            strategy: TrainingStrategy::default(),
        }
    }
}

impl TrainingConfig {
    pub fn builder() -> TrainingConfigBuilder {
        TrainingConfigBuilder::new()
    }

    /// Check the special tokens and the pattern flags.
    ///
    /// The pattern itself is compiled once, when training starts.
    pub fn validate(&self) -> Result<()> {
        if self.special_tokens.iter().any(|t| t.is_empty()) {
            return Err(TokenizerError::Config(
                "special tokens must not be empty strings".into(),
            ));
        }
        self.split.options().map(|_| ())
    }
}

/// Builder for [`TrainingConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrainingConfigBuilder {
    config: TrainingConfig,
}

impl TrainingConfigBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target vocabulary size.
    pub fn vocab_size(mut self, size: usize) -> Self {
        self.config.vocab_size = size;
        self
    }

    /// Replace the special tokens.
    pub fn special_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.special_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pre-tokenization rule.
    pub fn split(mut self, split: SplitConfig) -> Self {
        self.config.split = split;
        self
    }

    /// Set the pair counting strategy.
    pub fn strategy(mut self, strategy: TrainingStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<TrainingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
