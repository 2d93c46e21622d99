//! Pair index for incremental training.
//!
//! Maps every adjacent pair to its weighted count and to the words it occurs
//! in, so a merge only has to revisit the words that contain it.

use std::collections::BTreeMap;

use ahash::AHashMap;
use subword_core::Pair;

/// Position of a pair occurrence: `(word index, unit position)`.
///
/// Ordering by this tuple is the order in which a left-to-right scan of the
/// words in corpus order would first see each pair.
pub type Occurrence = (usize, usize);

/// Aggregate statistics for one pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairStats {
    /// Occurrences weighted by word frequency
    pub count: u64,
    /// Word index -> occurrences of the pair in that word
    pub words: BTreeMap<usize, u32>,
}

/// Index from pair to [`PairStats`].
#[derive(Debug, Default)]
pub struct PairIndex {
    pairs: AHashMap<Pair, PairStats>,
}

impl PairIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every word of a word table.
    pub fn build(words: &[Vec<u32>], word_counts: &[u64]) -> Self {
        let mut index = Self::new();
        for (i, (units, &count)) in words.iter().zip(word_counts).enumerate() {
            index.add_word(i, units, count);
        }
        index
    }

    /// Add the pairs of `units`, the current split of word `word`.
    pub fn add_word(&mut self, word: usize, units: &[u32], count: u64) {
        for window in units.windows(2) {
            let stats = self.pairs.entry((window[0], window[1])).or_default();
            stats.count += count;
            *stats.words.entry(word).or_insert(0) += 1;
        }
    }

    /// Remove the pairs of `units`, which must be what was last added for
    /// word `word`.
    pub fn remove_word(&mut self, word: usize, units: &[u32], count: u64) {
        for window in units.windows(2) {
            let pair = (window[0], window[1]);
            let Some(stats) = self.pairs.get_mut(&pair) else {
                continue;
            };

            stats.count = stats.count.saturating_sub(count);
            if let Some(n) = stats.words.get_mut(&word) {
                *n -= 1;
                if *n == 0 {
                    stats.words.remove(&word);
                }
            }
            if stats.words.is_empty() {
                self.pairs.remove(&pair);
            }
        }
    }

    #[inline]
    pub fn get(&self, pair: Pair) -> Option<&PairStats> {
        self.pairs.get(&pair)
    }

    /// Weighted count of `pair`, 0 if absent.
    #[inline]
    pub fn count(&self, pair: Pair) -> u64 {
        self.pairs.get(&pair).map_or(0, |s| s.count)
    }

    /// Indices of the words containing `pair`, ascending.
    pub fn words_with(&self, pair: Pair) -> Vec<usize> {
        self.pairs
            .get(&pair)
            .map(|s| s.words.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Where a corpus-order scan would first see `pair`.
    pub fn first_occurrence(&self, pair: Pair, words: &[Vec<u32>]) -> Option<Occurrence> {
        let (&word, _) = self.pairs.get(&pair)?.words.first_key_value()?;
        let position = words
            .get(word)?
            .windows(2)
            .position(|w| (w[0], w[1]) == pair)?;
        Some((word, position))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pair, &PairStats)> + '_ {
        self.pairs.iter().map(|(&pair, stats)| (pair, stats))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
