//! Word table and pair counting for BPE training.
//!
//! Identical pre-tokens are stored once with an occurrence count. Words keep
//! the order in which they first appeared in the corpus, which is what the
//! "first observed" tie-break between equally frequent pairs is defined on.

use std::collections::BTreeSet;

use ahash::AHashMap;
use compact_str::CompactString;
use subword_core::{Pair, Result, TokenizerError, Vocabulary};

/// Counter for BPE pair frequencies over de-duplicated words.
#[derive(Debug, Default)]
pub struct PairCounter {
    /// Word -> current split (as token IDs)
    words: Vec<Vec<u32>>,
    /// Word -> frequency count
    word_counts: Vec<u64>,
    /// Word -> original text
    texts: Vec<CompactString>,
    /// Text -> word index
    index: AHashMap<CompactString, usize>,
}

impl PairCounter {
    /// Create a new pair counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a counter from pre-tokens in corpus order.
    pub fn from_words<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counter = Self::new();
        for word in words {
            counter.add_word(word);
        }
        counter
    }

    /// Record one occurrence of a pre-token.
    ///
    /// The word is not split into units until [`PairCounter::initialize`].
    pub fn add_word(&mut self, word: &str) {
        if let Some(&pos) = self.index.get(word) {
            self.word_counts[pos] += 1;
            return;
        }

        let text = CompactString::new(word);
        self.index.insert(text.clone(), self.texts.len());
        self.texts.push(text);
        self.words.push(Vec::new());
        self.word_counts.push(1);
    }

    /// Distinct characters of all words, in code point order.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.texts.iter().flat_map(|t| t.chars()).collect()
    }

    /// Split every word into single-character units.
    ///
    /// Every character must already have an id in `vocab`.
    pub fn initialize(&mut self, vocab: &Vocabulary) -> Result<()> {
        let mut buf = [0u8; 4];
        for (text, units) in self.texts.iter().zip(self.words.iter_mut()) {
            *units = text
                .chars()
                .map(|c| {
                    vocab.get_id(c.encode_utf8(&mut buf)).ok_or_else(|| {
                        TokenizerError::Training(format!("character {c:?} has no base id"))
                    })
                })
                .collect::<Result<_>>()?;
        }
        Ok(())
    }

    /// Count all pairs, weighted by word frequency.
    pub fn count_pairs(&self) -> AHashMap<Pair, u64> {
        let mut pair_counts: AHashMap<Pair, u64> = AHashMap::new();

        for (word, &count) in self.words.iter().zip(self.word_counts.iter()) {
            for window in word.windows(2) {
                *pair_counts.entry((window[0], window[1])).or_insert(0) += count;
            }
        }

        pair_counts
    }

    /// The most frequent pair; ties go to the pair seen first when scanning
    /// words in corpus order, left to right.
    pub fn best_pair(&self) -> Option<(Pair, u64)> {
        // pair -> (count, order of first sighting)
        let mut tally: AHashMap<Pair, (u64, usize)> = AHashMap::new();

        for (word, &count) in self.words.iter().zip(self.word_counts.iter()) {
            for window in word.windows(2) {
                let seen = tally.len();
                tally.entry((window[0], window[1])).or_insert((0, seen)).0 += count;
            }
        }

        tally
            .into_iter()
            .max_by(|(_, (ca, fa)), (_, (cb, fb))| ca.cmp(cb).then_with(|| fb.cmp(fa)))
            .map(|(pair, (count, _))| (pair, count))
    }

    /// Merge a pair in one word, left to right and non-overlapping.
    ///
    /// Returns true if the word changed.
    pub fn merge_pair_in_word(&mut self, word: usize, pair: Pair, new_token_id: u32) -> bool {
        let Some(units) = self.words.get_mut(word) else {
            return false;
        };
        merge_units(units, pair, new_token_id)
    }

    /// Merge a pair in all words.
    ///
    /// Returns the number of words that changed.
    pub fn merge_pair_in_words(&mut self, pair: Pair, new_token_id: u32) -> usize {
        let mut changed = 0;
        for units in &mut self.words {
            if merge_units(units, pair, new_token_id) {
                changed += 1;
            }
        }
        changed
    }

    /// Get the number of unique words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Get the total count of all word occurrences.
    pub fn total_word_occurrences(&self) -> u64 {
        self.word_counts.iter().sum()
    }

    /// Current splits, indexed like [`PairCounter::texts`].
    pub fn words(&self) -> &[Vec<u32>] {
        &self.words
    }

    pub fn word_counts(&self) -> &[u64] {
        &self.word_counts
    }

    pub fn texts(&self) -> &[CompactString] {
        &self.texts
    }
}

fn merge_units(units: &mut Vec<u32>, pair: Pair, new_token_id: u32) -> bool {
    let mut changed = false;
    let mut read = 0;
    let mut write = 0;

    while read < units.len() {
        if read + 1 < units.len() && units[read] == pair.0 && units[read + 1] == pair.1 {
            units[write] = new_token_id;
            read += 2;
            changed = true;
        } else {
            units[write] = units[read];
            read += 1;
        }
        write += 1;
    }
    units.truncate(write);

    changed
}
