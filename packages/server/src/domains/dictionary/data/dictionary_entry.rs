//! Dictionary entry representation returned to clients.

use serde::{Deserialize, Serialize};

use crate::common::DictionaryEntryId;
use crate::domains::dictionary::models::DictionaryEntry;
use crate::kernel::SearchDocument;

/// Public view of an entry. Search hits from either store map to this shape,
/// so callers cannot tell which store served a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntryData {
    pub id: DictionaryEntryId,
    pub word: String,
    pub definition: Option<String>,
    pub video_url: String,
}

impl From<DictionaryEntry> for DictionaryEntryData {
    fn from(entry: DictionaryEntry) -> Self {
        Self {
            id: entry.id,
            word: entry.word,
            definition: entry.definition,
            video_url: entry.video_url,
        }
    }
}

impl From<SearchDocument> for DictionaryEntryData {
    fn from(doc: SearchDocument) -> Self {
        Self {
            id: doc.id,
            word: doc.word,
            definition: doc.definition,
            video_url: doc.video_url,
        }
    }
}
