//! Special tokens.
//!
//! Special tokens are reserved strings that are seeded into the vocabulary
//! before anything is learned. They keep the order in which they were first
//! given; later duplicates are dropped.

use ahash::AHashSet;
use compact_str::CompactString;

/// Special token conventionally used for units missing from the vocabulary.
pub const DEFAULT_UNKNOWN_TOKEN: &str = "<UNK>";

/// Ordered, de-duplicated set of special token strings.
#[derive(Debug, Clone, Default)]
pub struct SpecialTokens {
    tokens: Vec<CompactString>,
    lookup: AHashSet<CompactString>,
}

impl SpecialTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a token; returns false if it was already present.
    pub fn insert(&mut self, token: &str) -> bool {
        if self.lookup.contains(token) {
            return false;
        }
        let token = CompactString::new(token);
        self.lookup.insert(token.clone());
        self.tokens.push(token);
        true
    }

    /// Check if a string is a special token.
    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.lookup.contains(token)
    }

    /// Tokens in order of first occurrence.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(|t| t.as_str())
    }

    pub fn as_slice(&self) -> &[CompactString] {
        &self.tokens
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SpecialTokens {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut special = SpecialTokens::new();
        for token in iter {
            special.insert(token.as_ref());
        }
        special
    }
}

impl PartialEq for SpecialTokens {
    fn eq(&self, other: &Self) -> bool {
        self.tokens == other.tokens
    }
}

impl Eq for SpecialTokens {}
