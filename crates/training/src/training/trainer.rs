//! BPE trainer implementation.
//!
//! Training seeds the vocabulary with the special tokens and the base
//! alphabet of the corpus, then repeatedly merges the most frequent adjacent
//! pair until the target size is reached or no pair is left.

use ahash::AHashSet;
use compact_str::CompactString;
use subword_core::{
    MergeRules, Pair, Result, SpecialTokens, TokenizerError, Vocabulary, VocabularyModel,
};

use super::config::{TrainingConfig, TrainingStrategy};
use super::counter::PairCounter;
use super::pair_index::PairIndex;
use super::queue::{MergeCandidate, PairPriorityQueue};

/// A de-duplicated pre-token and its split after training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainedWord {
    pub text: CompactString,
    /// Occurrences in the corpus
    pub count: u64,
    /// Final working split, as token ids
    pub units: Vec<u32>,
}

/// A trained model together with the final working splits.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: VocabularyModel,
    /// Words in order of first appearance in the corpus
    pub words: Vec<TrainedWord>,
}

/// BPE trainer.
///
/// Trains a BPE tokenizer from text data by iteratively merging the most
/// frequent character pairs.
#[derive(Debug, Clone, Default)]
pub struct BpeTrainer {
    config: TrainingConfig,
}

impl BpeTrainer {
    /// Create a new BPE trainer with the given configuration.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Create a new BPE trainer with default configuration and the given size.
    pub fn with_vocab_size(vocab_size: usize) -> Self {
        Self::new(TrainingConfig {
            vocab_size,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train a model on `corpus`.
    pub fn train(&self, corpus: &str) -> Result<VocabularyModel> {
        self.train_detailed(corpus).map(|outcome| outcome.model)
    }

    /// Train a model on `corpus` and keep the final working splits.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip(self, corpus), fields(vocab_size = self.config.vocab_size))
    )]
    pub fn train_detailed(&self, corpus: &str) -> Result<TrainingOutcome> {
        self.config.validate()?;
        let splitter = self.config.split.compile()?;

        let special: SpecialTokens = self.config.special_tokens.iter().collect();
        let mut vocab = Vocabulary::with_capacity(self.config.vocab_size.min(1 << 16));
        for token in special.iter() {
            vocab.add_token(token)?;
        }

        let mut counter = PairCounter::from_words(splitter.split_words(corpus));
        let mut buf = [0u8; 4];
        for c in counter.alphabet() {
            vocab.add_token(c.encode_utf8(&mut buf))?;
        }
        counter.initialize(&vocab)?;

        log::info!(
            "Starting BPE training ({}): {} words ({} unique), {} seed tokens, target {}",
            self.config.strategy,
            counter.total_word_occurrences(),
            counter.word_count(),
            vocab.len(),
            self.config.vocab_size
        );

        let mut merges = MergeRules::new();
        match self.config.strategy {
            TrainingStrategy::Rescan => self.merge_rescan(&mut counter, &mut vocab, &mut merges)?,
            TrainingStrategy::Incremental => {
                self.merge_incremental(&mut counter, &mut vocab, &mut merges)?
            }
        }

        log::info!(
            "Training complete: {} tokens, {} merges",
            vocab.len(),
            merges.len()
        );

        let words = counter
            .texts()
            .iter()
            .zip(counter.words())
            .zip(counter.word_counts())
            .map(|((text, units), &count)| TrainedWord {
                text: text.clone(),
                count,
                units: units.clone(),
            })
            .collect();
        let model = VocabularyModel::from_parts(vocab, merges, special, splitter)?;

        Ok(TrainingOutcome { model, words })
    }

    /// Full recount of every pair after each merge.
    fn merge_rescan(
        &self,
        counter: &mut PairCounter,
        vocab: &mut Vocabulary,
        merges: &mut MergeRules,
    ) -> Result<()> {
        while vocab.len() < self.config.vocab_size {
            let Some((pair, count)) = counter.best_pair() else {
                break;
            };
            let new_token_id = learn_merge(vocab, merges, pair, count)?;
            counter.merge_pair_in_words(pair, new_token_id);
        }
        Ok(())
    }

    /// Pair index plus lazy heap; only words containing the merged pair are
    /// rewritten.
    fn merge_incremental(
        &self,
        counter: &mut PairCounter,
        vocab: &mut Vocabulary,
        merges: &mut MergeRules,
    ) -> Result<()> {
        let mut index = PairIndex::build(counter.words(), counter.word_counts());
        log::debug!("Pair index holds {} unique pairs", index.len());

        let mut queue = PairPriorityQueue::with_capacity(index.len());
        for (pair, stats) in index.iter() {
            if let Some(first) = index.first_occurrence(pair, counter.words()) {
                queue.push(MergeCandidate::new(pair, stats.count, first));
            }
        }

        while vocab.len() < self.config.vocab_size {
            let Some(candidate) = queue.pop() else {
                break;
            };
            let new_token_id = learn_merge(vocab, merges, candidate.pair, candidate.count)?;

            let mut touched: AHashSet<Pair> = AHashSet::new();
            for word in index.words_with(candidate.pair) {
                let count = counter.word_counts()[word];
                let before = counter.words()[word].clone();
                if !counter.merge_pair_in_word(word, candidate.pair, new_token_id) {
                    continue;
                }
                let after = &counter.words()[word];

                index.remove_word(word, &before, count);
                index.add_word(word, after, count);
                touched.extend(before.windows(2).map(|w| (w[0], w[1])));
                touched.extend(after.windows(2).map(|w| (w[0], w[1])));
            }

            for pair in touched {
                match index.first_occurrence(pair, counter.words()) {
                    Some(first) => queue.push(MergeCandidate::new(pair, index.count(pair), first)),
                    None => queue.remove(pair),
                }
            }
        }
        Ok(())
    }
}

/// Record the merge of `pair` and return the id of the merged unit.
///
/// Different merge routes can spell the same string, so a pair that was
/// already learned may come back; it is applied again with its existing
/// result and not recorded twice.
fn learn_merge(
    vocab: &mut Vocabulary,
    merges: &mut MergeRules,
    pair: Pair,
    count: u64,
) -> Result<u32> {
    if let Some((rank, new_token_id)) = merges.get(pair) {
        log::debug!("Reapplying merge #{rank} for {pair:?}");
        return Ok(new_token_id);
    }

    let token_string = |id: u32| {
        vocab
            .get_token(id)
            .ok_or_else(|| TokenizerError::Training(format!("unit id {id} has no token")))
    };
    let left = token_string(pair.0)?;
    let right = token_string(pair.1)?;
    let mut merged = CompactString::with_capacity(left.len() + right.len());
    merged.push_str(left);
    merged.push_str(right);

    let new_token_id = vocab.add_token(&merged)?;
    let rank = merges.push(pair, new_token_id)?;
    log::debug!("Merge #{rank}: {merged:?} (count {count}, id {new_token_id})");

    Ok(new_token_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use subword_core::SplitConfig;

    const CORPUS: &str = "Hello world! This is a sample corpus for training the BPE tokenizer.
The quick brown fox jumps over the lazy dog.
Tokenization is the first step in NLP.
Byte Pair Encoding (BPE) is a popular algorithm.";

    fn trainer(vocab_size: usize, special: &[&str], strategy: TrainingStrategy) -> BpeTrainer {
        BpeTrainer::new(
            TrainingConfig::builder()
                .vocab_size(vocab_size)
                .special_tokens(special.iter().copied())
                .split(SplitConfig::new(r"\w+|[^\w\s]+", "g"))
                .strategy(strategy)
                .build()
                .unwrap(),
        )
    }

    fn merge_strings(model: &VocabularyModel) -> Vec<(String, String)> {
        model
            .merges()
            .map(|m| (m.left.to_string(), m.right.to_string()))
            .collect()
    }

    #[test]
    fn test_canonical_trace() {
        for strategy in [TrainingStrategy::Rescan, TrainingStrategy::Incremental] {
            let model = trainer(258, &[], strategy).train("aaabdaaabac").unwrap();

            let base: Vec<_> = (0..4).filter_map(|id| model.get_token(id)).collect();
            assert_eq!(base, vec!["a", "b", "c", "d"]);

            let expected = [
                ("a", "a"),
                ("aa", "a"),
                ("aaa", "b"),
                ("aaab", "d"),
                ("aaabd", "aaab"),
                ("aaabdaaab", "a"),
                ("aaabdaaaba", "c"),
            ];
            let expected: Vec<(String, String)> = expected
                .iter()
                .map(|(l, r)| (l.to_string(), r.to_string()))
                .collect();
            assert_eq!(merge_strings(&model), expected, "strategy {strategy}");
            assert_eq!(model.len(), 11);
        }
    }

    #[test]
    fn test_strategies_agree() {
        for size in [40, 120, 400] {
            let rescan = trainer(size, &["<UNK>", "<PAD>"], TrainingStrategy::Rescan)
                .train_detailed(CORPUS)
                .unwrap();
            let incremental = trainer(size, &["<UNK>", "<PAD>"], TrainingStrategy::Incremental)
                .train_detailed(CORPUS)
                .unwrap();

            assert_eq!(rescan.model, incremental.model, "vocab size {size}");
            assert_eq!(rescan.words, incremental.words);
        }
    }

    #[test]
    fn test_deterministic() {
        let a = trainer(150, &["<UNK>"], TrainingStrategy::Incremental)
            .train(CORPUS)
            .unwrap();
        let b = trainer(150, &["<UNK>"], TrainingStrategy::Incremental)
            .train(CORPUS)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_size_bound() {
        let model = trainer(60, &["<UNK>"], TrainingStrategy::default())
            .train(CORPUS)
            .unwrap();
        assert_eq!(model.len(), 60);

        // Pairs run out long before 10_000
        let model = trainer(10_000, &["<UNK>"], TrainingStrategy::default())
            .train(CORPUS)
            .unwrap();
        assert!(model.len() < 10_000);
    }

    #[test]
    fn test_ids_dense_and_ranks_ordered() {
        let model = trainer(120, &["<UNK>"], TrainingStrategy::default())
            .train(CORPUS)
            .unwrap();

        for (id, token) in model.vocabulary().iter() {
            assert_eq!(model.get_id(token), Some(id));
        }
        for (i, merge) in model.merges().enumerate() {
            assert_eq!(merge.rank as usize, i);
            assert_eq!(merge.result, format!("{}{}", merge.left, merge.right));
        }
    }

    #[test]
    fn test_special_tokens_first() {
        let model = trainer(60, &["<UNK>", "<PAD>", "<UNK>", "<EOS>"], TrainingStrategy::default())
            .train("hello hello")
            .unwrap();

        assert_eq!(model.get_id("<UNK>"), Some(0));
        assert_eq!(model.get_id("<PAD>"), Some(1));
        assert_eq!(model.get_id("<EOS>"), Some(2));
        assert_eq!(model.special_tokens().len(), 3);
        // alphabet follows in code point order
        assert_eq!(model.get_token(3), Some("e"));
        assert_eq!(model.get_token(4), Some("h"));
    }

    #[test]
    fn test_special_token_spelled_like_a_char() {
        let model = trainer(10, &["a"], TrainingStrategy::default())
            .train("ab ab")
            .unwrap();
        assert_eq!(model.get_id("a"), Some(0));
        assert_eq!(model.get_id("b"), Some(1));
        assert_eq!(model.get_id("ab"), Some(2));
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_degenerate_inputs() {
        let model = trainer(100, &["<UNK>"], TrainingStrategy::default())
            .train("")
            .unwrap();
        assert_eq!(model.len(), 1);
        assert!(model.merge_rules().is_empty());

        // Target below the seed size: nothing is learned, nothing is dropped
        let model = trainer(2, &["<UNK>"], TrainingStrategy::default())
            .train("abc abc")
            .unwrap();
        assert_eq!(model.len(), 4);
        assert!(model.merge_rules().is_empty());
    }

    #[test]
    fn test_replay_matches_working_split() {
        let outcome = trainer(90, &[], TrainingStrategy::default())
            .train_detailed(CORPUS)
            .unwrap();
        let model = &outcome.model;

        for word in &outcome.words {
            let mut units: Vec<u32> = word
                .text
                .chars()
                .filter_map(|c| model.get_id(&c.to_string()))
                .collect();
            for rule in model.merge_rules() {
                let mut merged = Vec::with_capacity(units.len());
                let mut i = 0;
                while i < units.len() {
                    if i + 1 < units.len() && (units[i], units[i + 1]) == rule.pair {
                        merged.push(rule.result);
                        i += 2;
                    } else {
                        merged.push(units[i]);
                        i += 1;
                    }
                }
                units = merged;
            }
            assert_eq!(units, word.units, "word {:?}", word.text);
        }
    }

    #[test]
    fn test_invalid_config_fails() {
        let trainer = BpeTrainer::new(TrainingConfig {
            split: SplitConfig::new("(", "g"),
            ..Default::default()
        });
        let err = trainer.train("text").unwrap_err();
        assert!(err.is_config_error());

        let built = TrainingConfig::builder()
            .split(SplitConfig::new("[a-", "g"))
            .build()
            .unwrap();
        let err = BpeTrainer::new(built).train("text").unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_learned_pair_is_reapplied() {
        let mut vocab = Vocabulary::new();
        for token in ["a", "b"] {
            vocab.add_token(token).unwrap();
        }
        let mut merges = MergeRules::new();

        let first = learn_merge(&mut vocab, &mut merges, (0, 1), 3).unwrap();
        let again = learn_merge(&mut vocab, &mut merges, (0, 1), 1).unwrap();

        assert_eq!(first, again);
        assert_eq!(vocab.get_token(first), Some("ab"));
        assert_eq!(merges.len(), 1);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_merge_result_reuses_existing_token() {
        let mut vocab = Vocabulary::new();
        for token in ["ab", "a", "b"] {
            vocab.add_token(token).unwrap();
        }
        let mut merges = MergeRules::new();

        assert_eq!(learn_merge(&mut vocab, &mut merges, (1, 2), 2).unwrap(), 0);
        assert_eq!(merges.get((1, 2)), Some((0, 0)));
        assert_eq!(vocab.len(), 3);
    }
}
