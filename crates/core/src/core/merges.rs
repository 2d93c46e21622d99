//! Learned merges, keyed by operand ids.
//!
//! The learning order is kept alongside the lookup table: the
//! position of a rule in that order is its rank.

use crate::error::{Result, TokenizerError};
use ahash::AHashMap;

/// Adjacent `(left, right)` token ids.
pub type Pair = (u32, u32);

/// `pair -> (rank, result id)`; lower ranks apply first.
pub type MergeMap = AHashMap<Pair, (u32, u32)>;

/// A learned merge, in id form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeRule {
    pub pair: Pair,
    pub result: u32,
    pub rank: u32,
}

/// Ordered collection of BPE merge rules with rank lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRules {
    /// Rules in learning order; `rules[i].rank == i`
    rules: Vec<MergeRule>,
    merges: MergeMap,
}

impl MergeRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rules: Vec::with_capacity(capacity),
            merges: MergeMap::with_capacity(capacity),
        }
    }

    /// Append a merge rule; its rank is the number of rules before it.
    ///
    /// A pair can only be learned once.
    pub fn push(&mut self, pair: Pair, result: u32) -> Result<u32> {
        let rank = self.rules.len() as u32;
        if let Some(&(existing, _)) = self.merges.get(&pair) {
            return Err(TokenizerError::Load(format!(
                "merge pair {pair:?} at rank {rank} repeats rank {existing}"
            )));
        }

        self.merges.insert(pair, (rank, result));
        self.rules.push(MergeRule {
            pair,
            result,
            rank,
        });

        Ok(rank)
    }

    /// `(rank, result)` for a learned pair.
    #[inline]
    pub fn get(&self, pair: Pair) -> Option<(u32, u32)> {
        self.merges.get(&pair).copied()
    }

    /// The rule learned at `rank`.
    #[inline]
    pub fn by_rank(&self, rank: u32) -> Option<&MergeRule> {
        self.rules.get(rank as usize)
    }

    /// Rules in rank order.
    pub fn iter(&self) -> std::slice::Iter<'_, MergeRule> {
        self.rules.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a MergeRules {
    type Item = &'a MergeRule;
    type IntoIter = std::slice::Iter<'a, MergeRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
