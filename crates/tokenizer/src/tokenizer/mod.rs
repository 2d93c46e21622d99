//! Main tokenizer implementation.
//!
//! This module provides the high-level `Tokenizer` struct that owns a shared
//! model and hands out encoders and decoders over it, plus the plain
//! `train`/`encode`/`decode` functions.

use std::io::{Read, Write};
use std::sync::Arc;

use subword_core::{Result, SplitConfig, TokenizerError, VocabularyModel, DEFAULT_UNKNOWN_TOKEN};
use subword_training::{BpeTrainer, TrainingConfig, TrainingConfigBuilder, TrainingStrategy};

use crate::decoder::Decoder;
use crate::encoder::{EncodeStep, Encoder, Token};
use crate::io::{ModelLoader, ModelSaver};
use crate::stats::TokenStats;

/// Builder that trains a tokenizer.
#[derive(Debug, Clone, Default)]
pub struct TokenizerBuilder {
    config: TrainingConfigBuilder,
}

impl TokenizerBuilder {
    /// Create a new tokenizer builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target vocabulary size.
    pub fn vocab_size(mut self, size: usize) -> Self {
        self.config = self.config.vocab_size(size);
        self
    }

    /// Set special tokens.
    pub fn special_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.special_tokens(tokens);
        self
    }

    /// Set the pre-tokenization rule.
    pub fn split(mut self, split: SplitConfig) -> Self {
        self.config = self.config.split(split);
        self
    }

    pub fn strategy(mut self, strategy: TrainingStrategy) -> Self {
        self.config = self.config.strategy(strategy);
        self
    }

    /// Train on `corpus` and wrap the model.
    pub fn train(self, corpus: &str) -> Result<Tokenizer> {
        let config = self.config.build()?;
        let model = BpeTrainer::new(config).train(corpus)?;
        Ok(Tokenizer::from_model(model))
    }
}

/// Main tokenizer struct.
///
/// Cheap to clone; clones share the model.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    model: Arc<VocabularyModel>,
    unknown_id: Option<u32>,
}

impl Tokenizer {
    /// Create a tokenizer builder.
    pub fn builder() -> TokenizerBuilder {
        TokenizerBuilder::new()
    }

    pub fn from_model(model: VocabularyModel) -> Self {
        Self::from_shared(Arc::new(model))
    }

    pub fn from_shared(model: Arc<VocabularyModel>) -> Self {
        let unknown_id = model.get_id(DEFAULT_UNKNOWN_TOKEN);
        Self { model, unknown_id }
    }

    /// Use `token` for units missing from the vocabulary.
    pub fn with_unknown_token(mut self, token: &str) -> Result<Self> {
        self.unknown_id = Some(self.model.get_id(token).ok_or_else(|| {
            TokenizerError::Config(format!("unknown token {token:?} is not in the vocabulary"))
        })?);
        Ok(self)
    }

    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.model).with_unknown_id(self.unknown_id)
    }

    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.model)
    }

    /// Encode text to tokens.
    pub fn encode(&self, text: &str) -> Encoding {
        Encoding::new(self.encoder().encode(text))
    }

    /// Encode a batch of texts (parallelized).
    pub fn encode_batch<S>(&self, texts: &[S]) -> Vec<Encoding>
    where
        S: AsRef<str> + Sync,
    {
        self.encoder()
            .encode_batch(texts)
            .into_iter()
            .map(Encoding::new)
            .collect()
    }

    /// Per pre-token encoding trace.
    pub fn encode_steps(&self, text: &str) -> Vec<EncodeStep> {
        self.encoder().encode_steps(text)
    }

    /// Decode token IDs back to text.
    ///
    /// # Arguments
    /// * `ids` - The token IDs to decode
    /// * `skip_special_tokens` - Whether to skip special tokens during decoding
    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> String {
        if skip_special_tokens {
            self.decoder().decode_skip_special(ids)
        } else {
            self.decoder().decode(ids)
        }
    }

    /// Get the vocabulary size.
    pub fn vocab_size(&self) -> usize {
        self.model.len()
    }

    pub fn model(&self) -> &Arc<VocabularyModel> {
        &self.model
    }

    pub fn to_json(&self) -> Result<String> {
        ModelSaver::new(&self.model).to_json()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        ModelSaver::new(&self.model).to_json_pretty()
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        ModelSaver::new(&self.model).to_writer(writer)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        ModelLoader::from_json(json).map(Self::from_model)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        ModelLoader::from_reader(reader).map(Self::from_model)
    }
}

impl std::str::FromStr for Tokenizer {
    type Err = TokenizerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

/// Result of encoding text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Token IDs
    pub ids: Vec<u32>,
    pub tokens: Vec<Token>,
}

impl Encoding {
    fn new(tokens: Vec<Token>) -> Self {
        let ids = tokens.iter().map(|t| t.id).collect();
        Self { ids, tokens }
    }

    /// Get the number of tokens.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Check if the encoding is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Get the tokens as strings.
    pub fn get_tokens(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.value.as_str()).collect()
    }

    pub fn stats(&self) -> TokenStats {
        TokenStats::from_tokens(&self.tokens)
    }
}

/// Train a model on `corpus`.
///
/// Fails only on configuration errors.
pub fn train<I, S>(
    corpus: &str,
    vocab_size: usize,
    split_config: SplitConfig,
    special_tokens: I,
) -> Result<VocabularyModel>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let config = TrainingConfig::builder()
        .vocab_size(vocab_size)
        .split(split_config)
        .special_tokens(special_tokens)
        .build()?;
    BpeTrainer::new(config).train(corpus)
}

/// Encode `text` with `model`.
pub fn encode(text: &str, model: &VocabularyModel) -> Vec<Token> {
    Encoder::new(model).encode(text)
}

/// Decode `ids` with `model`.
pub fn decode(ids: &[u32], model: &VocabularyModel) -> String {
    Decoder::new(model).decode(ids)
}
