//! Model serialization.

use std::io::Write;

use compact_str::CompactString;
use subword_core::{Result, VocabularyModel};

use super::format::{OrderedVocab, SerializedModel};
use super::transport_error;

/// Model saver - turns a trained model into its transport value.
///
/// Writing the bytes anywhere durable is up to the caller.
#[derive(Debug, Clone, Copy)]
pub struct ModelSaver<'a> {
    model: &'a VocabularyModel,
}

impl<'a> ModelSaver<'a> {
    pub fn new(model: &'a VocabularyModel) -> Self {
        Self { model }
    }

    /// Compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.serialize())?)
    }

    /// Indented JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.serialize())?)
    }

    /// Write indented JSON to `writer`.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.serialize()).map_err(transport_error)?;
        Ok(())
    }

    /// Build the transport structure.
    pub fn serialize(&self) -> SerializedModel {
        let vocab = self
            .model
            .vocabulary()
            .iter()
            .map(|(id, token)| (CompactString::new(token), id))
            .collect();

        let merges = self
            .model
            .merges()
            .map(|m| [CompactString::new(m.left), CompactString::new(m.right)])
            .collect();

        SerializedModel {
            vocab: OrderedVocab(vocab),
            merges,
            special_tokens: self.model.special_tokens().as_slice().to_vec(),
            split_config: self.model.split_config().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subword_core::SplitConfig;
    use subword_training::{BpeTrainer, TrainingConfig};

    #[test]
    fn test_serialize() {
        let config = TrainingConfig::builder()
            .vocab_size(10)
            .special_tokens(["<UNK>"])
            .split(SplitConfig::new(r"\S+", "g"))
            .build()
            .unwrap();
        let model = BpeTrainer::new(config).train("ab ab").unwrap();
        let serialized = ModelSaver::new(&model).serialize();

        let ids: Vec<u32> = serialized.vocab.0.iter().map(|(_, id)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(serialized.vocab.0[3].0, "ab");
        assert_eq!(serialized.merges.len(), 1);
        assert_eq!(serialized.special_tokens.len(), 1);

        let json = ModelSaver::new(&model).to_json().unwrap();
        assert!(json.starts_with(r#"{"vocab":{"<UNK>":0,"a":1,"b":2,"ab":3}"#));

        let mut buf = Vec::new();
        ModelSaver::new(&model).to_writer(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            ModelSaver::new(&model).to_json_pretty().unwrap()
        );
    }
}
