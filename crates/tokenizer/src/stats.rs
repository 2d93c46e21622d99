//! Summary statistics over an encoding.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::encoder::Token;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    pub total_tokens: usize,
    /// Distinct token values
    pub unique_tokens: usize,
    /// Mean characters per token, 0.0 for no tokens
    pub average_length: f64,
    /// Characters over all token values
    pub character_count: usize,
}

impl TokenStats {
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let unique: AHashSet<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        let character_count: usize = tokens.iter().map(|t| t.value.chars().count()).sum();
        let average_length = if tokens.is_empty() {
            0.0
        } else {
            character_count as f64 / tokens.len() as f64
        };

        Self {
            total_tokens: tokens.len(),
            unique_tokens: unique.len(),
            average_length,
            character_count,
        }
    }
}
