//! Transport format for trained models.
//!
//! ```json
//! { "vocab": {"<UNK>": 0, "a": 1, "b": 2, "ab": 3},
//!   "merges": [["a", "b"]],
//!   "specialTokens": ["<UNK>"],
//!   "splitConfig": {"pattern": "\\S+", "patternOptions": "g"} }
//! ```
//!
//! `vocab` is written in id order and read back in document order.

use std::fmt;

use compact_str::CompactString;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subword_core::SplitConfig;

/// `(token, id)` entries, serialized as a JSON object that keeps their order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedVocab(pub Vec<(CompactString, u32)>);

impl Serialize for OrderedVocab {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (token, id) in &self.0 {
            map.serialize_entry(token, id)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for OrderedVocab {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVocabVisitor;

        impl<'de> Visitor<'de> for OrderedVocabVisitor {
            type Value = OrderedVocab;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from token strings to ids")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((token, id)) = access.next_entry::<CompactString, u32>()? {
                    entries.push((token, id));
                }
                Ok(OrderedVocab(entries))
            }
        }

        deserializer.deserialize_map(OrderedVocabVisitor)
    }
}

/// Complete model serialization format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedModel {
    /// Token -> id
    pub vocab: OrderedVocab,
    /// Merge operands, in rank order
    pub merges: Vec<[CompactString; 2]>,
    pub special_tokens: Vec<CompactString>,
    pub split_config: SplitConfig,
}
