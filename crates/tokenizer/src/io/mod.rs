//! JSON transport for trained models.
//!
//! This module converts a [`VocabularyModel`](subword_core::VocabularyModel)
//! to and from its JSON transport value. Persisting the bytes is the
//! caller's business.

pub mod format;
pub mod load;
pub mod save;

pub use format::{OrderedVocab, SerializedModel};
pub use load::ModelLoader;
pub use save::ModelSaver;

use subword_core::TokenizerError;

/// Split serde_json failures into reader/writer failures and the rest.
pub(crate) fn transport_error(err: serde_json::Error) -> TokenizerError {
    if err.is_io() {
        TokenizerError::Io(err.into())
    } else {
        TokenizerError::Json(err)
    }
}
