//! The trained vocabulary model.
//!
//! A [`VocabularyModel`] bundles the id mapping, the ordered merge history,
//! the special tokens and the compiled split rule. It is built once (by a
//! training run or by loading a transport value) and never mutated
//! afterwards; encoders and decoders only borrow it.

use crate::core::merges::{MergeRule, MergeRules, Pair};
use crate::core::special::SpecialTokens;
use crate::core::vocab::Vocabulary;
use crate::error::{Result, TokenizerError};
use crate::split::{SplitConfig, Splitter};

/// A learned merge with its unit strings resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge<'a> {
    pub left: &'a str,
    pub right: &'a str,
    pub result: &'a str,
    pub rank: u32,
}

/// Immutable BPE vocabulary model.
#[derive(Debug, Clone)]
pub struct VocabularyModel {
    vocab: Vocabulary,
    merges: MergeRules,
    special: SpecialTokens,
    splitter: Splitter,
}

impl VocabularyModel {
    /// Assemble a model, checking the cross-part invariants.
    ///
    /// Every special token must be in the vocabulary, and every merge result
    /// must be the concatenation of its two operands.
    pub fn from_parts(
        vocab: Vocabulary,
        merges: MergeRules,
        special: SpecialTokens,
        splitter: Splitter,
    ) -> Result<Self> {
        if let Some(missing) = special.iter().find(|t| !vocab.contains(t)) {
            return Err(TokenizerError::Load(format!(
                "special token {missing:?} is not in the vocabulary"
            )));
        }

        for rule in &merges {
            let lookup = |id: u32| {
                vocab.get_token(id).ok_or_else(|| {
                    TokenizerError::Load(format!(
                        "merge at rank {} references unknown id {id}",
                        rule.rank
                    ))
                })
            };
            let (left, right, result) =
                (lookup(rule.pair.0)?, lookup(rule.pair.1)?, lookup(rule.result)?);

            let concatenates = result.len() == left.len() + right.len()
                && result.starts_with(left)
                && result.ends_with(right);
            if !concatenates {
                return Err(TokenizerError::Load(format!(
                    "merge at rank {} maps ({left:?}, {right:?}) to {result:?}",
                    rule.rank
                )));
            }
        }

        Ok(Self {
            vocab,
            merges,
            special,
            splitter,
        })
    }

    /// Number of entries in the vocabulary.
    #[inline]
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    #[inline]
    pub fn get_id(&self, token: &str) -> Option<u32> {
        self.vocab.get_id(token)
    }

    #[inline]
    pub fn get_token(&self, id: u32) -> Option<&str> {
        self.vocab.get_token(id)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Id-level merge rules.
    pub fn merge_rules(&self) -> &MergeRules {
        &self.merges
    }

    /// `(rank, result_id)` of the merge learned for `pair`, if any.
    #[inline]
    pub fn merge_for(&self, pair: Pair) -> Option<(u32, u32)> {
        self.merges.get(pair)
    }

    /// Merges with resolved strings, in rank order.
    pub fn merges(&self) -> impl Iterator<Item = Merge<'_>> + '_ {
        self.merges.iter().map(move |rule| self.resolve(rule))
    }

    pub fn special_tokens(&self) -> &SpecialTokens {
        &self.special
    }

    #[inline]
    pub fn is_special(&self, token: &str) -> bool {
        self.special.contains(token)
    }

    pub fn split_config(&self) -> &SplitConfig {
        self.splitter.config()
    }

    pub fn splitter(&self) -> &Splitter {
        &self.splitter
    }

    fn resolve(&self, rule: &MergeRule) -> Merge<'_> {
        // from_parts checked that all three ids exist
        let token = |id| self.vocab.get_token(id).unwrap_or_default();
        Merge {
            left: token(rule.pair.0),
            right: token(rule.pair.1),
            result: token(rule.result),
            rank: rule.rank,
        }
    }
}

impl PartialEq for VocabularyModel {
    fn eq(&self, other: &Self) -> bool {
        self.vocab == other.vocab
            && self.merges == other.merges
            && self.special == other.special
            && self.split_config() == other.split_config()
    }
}

impl Eq for VocabularyModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> (Vocabulary, MergeRules, SpecialTokens) {
        let mut vocab = Vocabulary::new();
        for token in ["<UNK>", "a", "b", "ab"] {
            vocab.add_token(token).unwrap();
        }
        let mut merges = MergeRules::new();
        merges.push((1, 2), 3).unwrap();
        let special: SpecialTokens = ["<UNK>"].into_iter().collect();
        (vocab, merges, special)
    }

    #[test]
    fn test_from_parts() {
        let (vocab, merges, special) = parts();
        let model = VocabularyModel::from_parts(
            vocab,
            merges,
            special,
            SplitConfig::default().compile().unwrap(),
        )
        .unwrap();

        assert_eq!(model.len(), 4);
        assert!(model.is_special("<UNK>"));
        assert!(!model.is_special("a"));
        assert_eq!(model.merge_for((1, 2)), Some((0, 3)));
        assert_eq!(
            model.merges().collect::<Vec<_>>(),
            vec![Merge {
                left: "a",
                right: "b",
                result: "ab",
                rank: 0
            }]
        );
        assert_eq!(model.split_config(), &SplitConfig::default());
    }

    #[test]
    fn test_rejects_missing_special() {
        let (vocab, merges, _) = parts();
        let special: SpecialTokens = ["<PAD>"].into_iter().collect();
        let result = VocabularyModel::from_parts(
            vocab,
            merges,
            special,
            SplitConfig::default().compile().unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_concatenating_merge() {
        let (vocab, _, special) = parts();
        let mut merges = MergeRules::new();
        merges.push((2, 1), 3).unwrap(); // "b" + "a" != "ab"
        let result = VocabularyModel::from_parts(
            vocab,
            merges,
            special,
            SplitConfig::default().compile().unwrap(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_model_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VocabularyModel>();
    }
}
