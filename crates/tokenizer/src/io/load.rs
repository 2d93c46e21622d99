//! Model deserialization and validation.

use std::io::Read;

use subword_core::{
    MergeRules, Result, SpecialTokens, TokenizerError, Vocabulary, VocabularyModel,
};

use super::format::SerializedModel;
use super::transport_error;

/// Model loader - rebuilds a model from its transport value.
pub struct ModelLoader;

impl ModelLoader {
    /// Load from a JSON string.
    pub fn from_json(json: &str) -> Result<VocabularyModel> {
        let serialized: SerializedModel = serde_json::from_str(json)?;
        Self::deserialize(serialized)
    }

    /// Load from a reader yielding JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<VocabularyModel> {
        let serialized: SerializedModel =
            serde_json::from_reader(reader).map_err(transport_error)?;
        Self::deserialize(serialized)
    }

    /// Validate a transport value and build the model.
    ///
    /// Ids must be dense and unique, every merge operand and result must be
    /// in the vocabulary, every special token must be in the vocabulary, and
    /// the split configuration must compile. Merge ranks are the positions in
    /// `merges`.
    pub fn deserialize(data: SerializedModel) -> Result<VocabularyModel> {
        let vocab = Vocabulary::from_entries(data.vocab.0)?;

        let mut merges = MergeRules::with_capacity(data.merges.len());
        for (rank, [left, right]) in data.merges.iter().enumerate() {
            let lookup = |token: &str| {
                vocab.get_id(token).ok_or_else(|| {
                    TokenizerError::Load(format!(
                        "merge at rank {rank} uses {token:?}, which is not in the vocabulary"
                    ))
                })
            };
            let pair = (lookup(left.as_str())?, lookup(right.as_str())?);
            let result = lookup(format!("{left}{right}").as_str())?;
            merges.push(pair, result)?;
        }

        let special: SpecialTokens = data.special_tokens.iter().collect();
        let splitter = data.split_config.compile()?;

        let model = VocabularyModel::from_parts(vocab, merges, special, splitter)?;
        log::debug!(
            "Loaded model: {} tokens, {} merges",
            model.len(),
            model.merge_rules().len()
        );

        Ok(model)
    }
}
