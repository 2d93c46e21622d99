//! Vocabulary storage and lookup.
//!
//! Ids are dense and handed out in allocation order, so the reverse mapping
//! is a plain vector indexed by id.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;
use compact_str::CompactString;

/// Forward mapping: token string -> ID
pub type Vocab = AHashMap<CompactString, u32>;

/// Reverse mapping: ID -> token string
pub type VocabR = Vec<CompactString>;

/// Sentinel id for units that have no vocabulary entry.
///
/// Never allocated to a token.
pub const INVALID_TOKEN_ID: u32 = u32::MAX;

/// Bidirectional token <-> id table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    vocab: Vocab,
    vocab_r: VocabR,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vocab: Vocab::with_capacity(capacity),
            vocab_r: VocabR::with_capacity(capacity),
        }
    }

    /// Rebuild a vocabulary from `(token, id)` entries in any order.
    ///
    /// The ids must be exactly `0..entries.len()` and the tokens distinct.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<CompactString>,
    {
        let entries: Vec<(CompactString, u32)> = entries
            .into_iter()
            .map(|(token, id)| (token.into(), id))
            .collect();
        if entries.len() >= INVALID_TOKEN_ID as usize {
            return Err(TokenizerError::VocabularyOverflow {
                max: INVALID_TOKEN_ID as usize,
            });
        }

        let n = entries.len();
        let mut slots: Vec<Option<CompactString>> = vec![None; n];
        let mut vocab = Vocab::with_capacity(n);

        for (token, id) in entries {
            let slot = slots.get_mut(id as usize).ok_or_else(|| {
                TokenizerError::Load(format!(
                    "token ids are not dense: {id} is out of range for {n} tokens"
                ))
            })?;
            if slot.replace(token.clone()).is_some() {
                return Err(TokenizerError::Load(format!("token id {id} is assigned twice")));
            }
            if vocab.insert(token.clone(), id).is_some() {
                return Err(TokenizerError::Load(format!(
                    "token {token:?} appears more than once"
                )));
            }
        }

        // Every id is in range and none repeats, so every slot is filled.
        let vocab_r = slots.into_iter().flatten().collect();

        Ok(Self { vocab, vocab_r })
    }

    /// Intern `token`.
    ///
    /// Returns the existing ID if the token is already present, otherwise the
    /// next free ID.
    pub fn add_token(&mut self, token: &str) -> Result<u32> {
        if let Some(&id) = self.vocab.get(token) {
            return Ok(id);
        }

        let id = self.vocab_r.len();
        if id >= INVALID_TOKEN_ID as usize {
            return Err(TokenizerError::VocabularyOverflow {
                max: INVALID_TOKEN_ID as usize,
            });
        }

        let id = id as u32;
        let token = CompactString::new(token);
        self.vocab_r.push(token.clone());
        self.vocab.insert(token, id);

        Ok(id)
    }

    /// Get the ID for a token string.
    #[inline]
    pub fn get_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    /// Get the token string for an ID.
    #[inline]
    pub fn get_token(&self, id: u32) -> Option<&str> {
        self.vocab_r.get(id as usize).map(|s| s.as_str())
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.vocab.contains_key(token)
    }

    /// Get the size of the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.vocab_r.len()
    }

    /// Check if the vocabulary is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocab_r.is_empty()
    }

    /// Iterate `(id, token)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.vocab_r
            .iter()
            .enumerate()
            .map(|(id, token)| (id as u32, token.as_str()))
    }

    /// The forward mapping.
    pub fn as_map(&self) -> &Vocab {
        &self.vocab
    }
}
