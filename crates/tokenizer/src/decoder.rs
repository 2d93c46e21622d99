//! Id to text decoding.
//!
//! Decoding is a plain concatenation of token strings. Ids without a
//! vocabulary entry contribute nothing.

use subword_core::VocabularyModel;

use crate::encoder::Token;

/// Decoder over a borrowed model.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    model: &'a VocabularyModel,
}

impl<'a> Decoder<'a> {
    pub fn new(model: &'a VocabularyModel) -> Self {
        Self { model }
    }

    /// Concatenate the strings of `ids`.
    pub fn decode(&self, ids: &[u32]) -> String {
        self.decode_filtered(ids, false)
    }

    /// Like [`Decoder::decode`], but special tokens are left out.
    pub fn decode_skip_special(&self, ids: &[u32]) -> String {
        self.decode_filtered(ids, true)
    }

    /// Decode the ids of already encoded tokens.
    pub fn decode_tokens(&self, tokens: &[Token]) -> String {
        let ids: Vec<u32> = tokens.iter().map(|t| t.id).collect();
        self.decode(&ids)
    }

    fn decode_filtered(&self, ids: &[u32], skip_special: bool) -> String {
        let mut text = String::with_capacity(ids.len() * 4);
        for &id in ids {
            match self.model.get_token(id) {
                Some(token) if skip_special && self.model.is_special(token) => {}
                Some(token) => text.push_str(token),
                None => log::trace!("skipping unknown id {id}"),
            }
        }
        text
    }
}
