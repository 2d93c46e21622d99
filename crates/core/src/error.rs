//! Error types for the subword tokenizer libraries.
//!
//! Only configuration-time and transport failures are hard errors. Data-time
//! anomalies (characters never seen in training, ids outside the vocabulary)
//! are recovered by the encoder and decoder and never surface here.

use thiserror::Error;

/// Main error type for the tokenizer libraries.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Invalid configuration (flags, special tokens, unknown-token choice, ...)
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A split pattern that neither regex engine accepts
    #[error("Invalid split pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Internal inconsistency detected while training
    #[error("Training error: {0}")]
    Training(String),

    /// Malformed or inconsistent model transport value
    #[error("Load error: {0}")]
    Load(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading or writing a transport value
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Vocabulary overflow
    #[error("Vocabulary size exceeded maximum of {max} entries")]
    VocabularyOverflow { max: usize },
}

impl TokenizerError {
    /// True for the configuration-time failures (`Config`, `InvalidPattern`).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TokenizerError::Config(_) | TokenizerError::InvalidPattern { .. }
        )
    }
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
