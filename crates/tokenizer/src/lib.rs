//! subword-tokenizer - High-level tokenizer API
//!
//! This crate ties the pieces together: rank-ordered encoding, decoding,
//! the JSON transport format, built-in split presets and token statistics.
//!
//! # Features
//!
//! - Encoding with byte offsets into the original text and a configurable
//!   unknown token
//! - Parallel batch encoding over a shared, immutable model
//! - JSON transport that validates every cross-reference on load
//! - Built-in split presets and a pluggable pattern generator
//!
//! # Example
//!
//! ```rust
//! use subword_tokenizer::{presets, Tokenizer};
//!
//! let split = presets::find_preset("Word & Punctuation").unwrap().split_config();
//! let tokenizer = Tokenizer::builder()
//!     .vocab_size(40)
//!     .special_tokens(["<UNK>"])
//!     .split(split)
//!     .train("low lower lowest, newer wider")?;
//!
//! // Encode text
//! let encoding = tokenizer.encode("lowest newer");
//! println!("{:?}", encoding.ids);
//!
//! // Decode tokens
//! let text = tokenizer.decode(&encoding.ids, false);
//! assert_eq!(text, "lowestnewer");
//! # Ok::<(), subword_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use subword_core::{
    Result, SplitConfig, TokenizerError, VocabularyModel, DEFAULT_UNKNOWN_TOKEN, INVALID_TOKEN_ID,
};
pub use subword_training::{TrainingConfig, TrainingStrategy};

pub mod decoder;
pub mod encoder;
pub use decoder::Decoder;
pub use encoder::{EncodeStep, Encoder, Token};

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::{decode, encode, train, Encoding, Tokenizer, TokenizerBuilder};

// IO/Serialization
pub mod io;
pub use io::{ModelLoader, ModelSaver, SerializedModel};

pub mod presets;
pub use presets::{resolve_split_config, PatternGenerator, Preset, PRESETS};

pub mod stats;
pub use stats::TokenStats;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
