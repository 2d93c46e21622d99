//! Rank-ordered BPE encoding.
//!
//! Each pre-token starts as single characters. The adjacent pair with the
//! lowest merge rank is merged at every occurrence, left to right and
//! without overlap, until no adjacent pair has a learned merge.

use compact_str::CompactString;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use subword_core::{
    PreToken, Result, TokenizerError, VocabularyModel, DEFAULT_UNKNOWN_TOKEN, INVALID_TOKEN_ID,
};

/// One emitted token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Vocabulary id, the unknown token's id, or [`INVALID_TOKEN_ID`]
    pub id: u32,
    /// The unit text as it appears in the input
    pub value: CompactString,
    /// Byte offset of the unit in the original text
    pub offset: usize,
    pub is_special: bool,
}

impl Token {
    /// True if the unit had no vocabulary entry of its own.
    pub fn is_unknown(&self, model: &VocabularyModel) -> bool {
        model.get_id(&self.value) != Some(self.id)
    }
}

/// Encoding trace of one pre-token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeStep {
    pub pre_token: CompactString,
    /// Byte offset of the pre-token in the original text
    pub offset: usize,
    pub tokens: Vec<Token>,
}

/// A unit of a working split: an id (if known) and a byte range of the
/// pre-token.
#[derive(Debug, Clone, Copy)]
struct Unit {
    id: Option<u32>,
    start: usize,
    end: usize,
}

/// Encoder over a borrowed model.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'a> {
    model: &'a VocabularyModel,
    unknown_id: Option<u32>,
}

impl<'a> Encoder<'a> {
    /// Create an encoder; unknown units map to `<UNK>` if the model has it.
    pub fn new(model: &'a VocabularyModel) -> Self {
        Self {
            model,
            unknown_id: model.get_id(DEFAULT_UNKNOWN_TOKEN),
        }
    }

    /// Map unknown units to `token` instead.
    pub fn with_unknown_token(mut self, token: &str) -> Result<Self> {
        let id = self.model.get_id(token).ok_or_else(|| {
            TokenizerError::Config(format!("unknown token {token:?} is not in the vocabulary"))
        })?;
        self.unknown_id = Some(id);
        Ok(self)
    }

    /// Emit [`INVALID_TOKEN_ID`] for unknown units.
    pub fn without_unknown_token(mut self) -> Self {
        self.unknown_id = None;
        self
    }

    pub(crate) fn with_unknown_id(mut self, id: Option<u32>) -> Self {
        self.unknown_id = id;
        self
    }

    pub fn unknown_id(&self) -> Option<u32> {
        self.unknown_id
    }

    pub fn model(&self) -> &'a VocabularyModel {
        self.model
    }

    /// Encode `text` into tokens.
    pub fn encode(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(text.len() / 2);
        for pre_token in self.model.splitter().split(text) {
            self.encode_pre_token(pre_token, &mut tokens);
        }
        tokens
    }

    /// Encode `text` into ids only.
    pub fn encode_ids(&self, text: &str) -> Vec<u32> {
        self.encode(text).into_iter().map(|t| t.id).collect()
    }

    /// Encode `text` and keep the tokens grouped by pre-token.
    pub fn encode_steps(&self, text: &str) -> Vec<EncodeStep> {
        self.model
            .splitter()
            .split(text)
            .into_iter()
            .map(|pre_token| {
                let mut tokens = Vec::new();
                self.encode_pre_token(pre_token, &mut tokens);
                EncodeStep {
                    pre_token: CompactString::new(pre_token.text),
                    offset: pre_token.offset,
                    tokens,
                }
            })
            .collect()
    }

    /// Encode many texts in parallel; output order matches input order.
    pub fn encode_batch<S>(&self, texts: &[S]) -> Vec<Vec<Token>>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.encode(t.as_ref())).collect()
    }

    fn encode_pre_token(&self, pre_token: PreToken<'_>, out: &mut Vec<Token>) {
        let word = pre_token.text;
        for unit in self.merge_units(word) {
            let value = &word[unit.start..unit.end];
            let id = match unit.id {
                Some(id) => id,
                None => {
                    log::trace!("unknown unit {value:?} at byte {}", pre_token.offset + unit.start);
                    self.unknown_id.unwrap_or(INVALID_TOKEN_ID)
                }
            };
            out.push(Token {
                id,
                value: CompactString::new(value),
                offset: pre_token.offset + unit.start,
                is_special: self.model.is_special(value),
            });
        }
    }

    /// Split `word` into characters and apply merges in rank order.
    fn merge_units(&self, word: &str) -> Vec<Unit> {
        let mut buf = [0u8; 4];
        let mut units: Vec<Unit> = word
            .char_indices()
            .map(|(start, c)| Unit {
                id: self.model.get_id(c.encode_utf8(&mut buf)),
                start,
                end: start + c.len_utf8(),
            })
            .collect();

        while units.len() > 1 {
            let best = units
                .windows(2)
                .filter_map(|w| {
                    let pair = (w[0].id?, w[1].id?);
                    let (rank, new_id) = self.model.merge_for(pair)?;
                    Some((rank, pair, new_id))
                })
                .min_by_key(|&(rank, _, _)| rank);
            let Some((_, pair, new_id)) = best else {
                break;
            };

            let mut merged = Vec::with_capacity(units.len());
            let mut i = 0;
            while i < units.len() {
                if i + 1 < units.len()
                    && units[i].id == Some(pair.0)
                    && units[i + 1].id == Some(pair.1)
                {
                    merged.push(Unit {
                        id: Some(new_id),
                        start: units[i].start,
                        end: units[i + 1].end,
                    });
                    i += 2;
                } else {
                    merged.push(units[i]);
                    i += 1;
                }
            }
            units = merged;
        }

        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subword_core::SplitConfig;
    use subword_training::{BpeTrainer, TrainingConfig};

    fn train(corpus: &str, vocab_size: usize, special: &[&str]) -> VocabularyModel {
        let config = TrainingConfig::builder()
            .vocab_size(vocab_size)
            .special_tokens(special.iter().copied())
            .split(SplitConfig::new(r"\S+", "g"))
            .build()
            .unwrap();
        BpeTrainer::new(config).train(corpus).unwrap()
    }

    #[test]
    fn test_encode_learned_word() {
        let model = train("ab ab ab", 10, &["<UNK>"]);
        let tokens = Encoder::new(&model).encode("ab");

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, "ab");
        assert_eq!(Some(tokens[0].id), model.get_id("ab"));
        assert!(!tokens[0].is_special);
    }

    #[test]
    fn test_unknown_unit_uses_unk() {
        let model = train("ab ab ab", 10, &["<UNK>"]);
        let tokens = Encoder::new(&model).encode("abc");

        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["ab", "c"]);
        assert_eq!(tokens[1].id, 0);
        assert_eq!(tokens[1].offset, 2);
        assert!(tokens[1].is_unknown(&model));
        assert!(!tokens[0].is_unknown(&model));
    }

    #[test]
    fn test_unknown_unit_without_unk() {
        let model = train("ab ab ab", 10, &[]);
        let encoder = Encoder::new(&model);
        assert_eq!(encoder.unknown_id(), None);

        let tokens = encoder.encode("abc");
        assert_eq!(tokens[1].id, INVALID_TOKEN_ID);
        assert_eq!(tokens[1].value, "c");
    }

    #[test]
    fn test_with_unknown_token() {
        let model = train("ab ab ab", 10, &["<UNK>", "<PAD>"]);
        let encoder = Encoder::new(&model).with_unknown_token("<PAD>").unwrap();
        assert_eq!(encoder.encode_ids("zz"), vec![1, 1]);

        let err = Encoder::new(&model).with_unknown_token("<MISSING>").unwrap_err();
        assert!(err.is_config_error());

        let encoder = Encoder::new(&model).without_unknown_token();
        assert_eq!(encoder.encode_ids("z"), vec![INVALID_TOKEN_ID]);
    }

    #[test]
    fn test_merges_apply_by_rank() {
        // "aaabdaaabac" learns aa, aaa, aaab, ...; encoding "aaab" must use
        // the rank order, not the first vocabulary match
        let model = train("aaabdaaabac", 258, &[]);
        let tokens = Encoder::new(&model).encode("aaab aab");

        let values: Vec<&str> = tokens.iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["aaab", "aa", "b"]);
    }

    #[test]
    fn test_offsets_are_bytes_in_original_text() {
        let model = train("héllo wörld", 20, &[]);
        let tokens = Encoder::new(&model).encode("  héllo   wörld");

        for token in &tokens {
            let text = "  héllo   wörld";
            assert_eq!(
                &text[token.offset..token.offset + token.value.len()],
                token.value.as_str()
            );
        }
        assert_eq!(tokens[0].offset, 2);
    }

    #[test]
    fn test_special_token_flag() {
        let model = train("<EOS> done <EOS>", 40, &["<EOS>"]);
        let tokens = Encoder::new(&model).encode("<EOS>");

        // the merges rebuild the special spelling, which keeps its seeded id
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_special);
        assert_eq!(tokens[0].id, 0);

        let tokens = Encoder::new(&model).encode("done");
        assert!(tokens.iter().all(|t| !t.is_special));
    }

    #[test]
    fn test_encode_steps() {
        let model = train("ab ab ab", 10, &["<UNK>"]);
        let steps = Encoder::new(&model).encode_steps("ab  abc");

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].pre_token, "abc");
        assert_eq!(steps[1].offset, 4);
        assert_eq!(steps[1].tokens.len(), 2);
        assert_eq!(steps[1].tokens[1].offset, 6);
    }

    #[test]
    fn test_batch_equals_sequential() {
        let model = train("the cat sat on the mat", 30, &["<UNK>"]);
        let encoder = Encoder::new(&model);
        let texts = ["the cat", "a mat sat", "", "xyz the"];

        let batch = encoder.encode_batch(&texts);
        let sequential: Vec<_> = texts.iter().map(|t| encoder.encode(t)).collect();
        assert_eq!(batch, sequential);
    }

    #[test]
    fn test_empty_text() {
        let model = train("ab", 10, &[]);
        assert!(Encoder::new(&model).encode("").is_empty());
        assert!(Encoder::new(&model).encode("   ").is_empty());
    }

    #[test]
    fn test_token_serde_shape() {
        let token = Token {
            id: 3,
            value: "ab".into(),
            offset: 0,
            is_special: false,
        };
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r#"{"id":3,"value":"ab","offset":0,"isSpecial":false}"#);
    }
}
