// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Dictionary and moderation rules live in domain actions that use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseSearchIndex)

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::{DictionaryEntryId, ServiceResult};

// =============================================================================
// Search Index Trait (Infrastructure - eventually consistent text search)
// =============================================================================

/// Document mirrored into the search index, keyed by the dictionary entry id.
///
/// Never authoritative: it may be stale or missing relative to Postgres and can
/// be rebuilt from `dictionary_entries` at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: DictionaryEntryId,
    pub word: String,
    pub definition: Option<String>,
    pub video_url: String,
}

#[async_trait]
pub trait BaseSearchIndex: Send + Sync {
    /// Create the index and apply search settings if needed.
    async fn ensure_index(&self) -> Result<()>;

    /// Insert or overwrite the document with the same id.
    async fn upsert(&self, document: &SearchDocument) -> Result<()>;

    /// Remove the document for `id`. Removing an absent document is not an error.
    async fn delete(&self, id: DictionaryEntryId) -> Result<()>;

    /// Remove every document.
    async fn clear(&self) -> Result<()>;

    /// Fuzzy/substring match over word and definition.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchDocument>>;
}

// =============================================================================
// Gesture Recognition Trait (Infrastructure - external AI service)
// =============================================================================

/// Result of recognizing a batch of hand-landmark frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    /// Text after the recognized character has been applied and accents restored
    pub predicted_word: String,
    pub confidence: Option<f32>,
    pub raw_char: Option<String>,
}

#[async_trait]
pub trait BaseGestureRecognizer: Send + Sync {
    /// Recognize a gesture from landmark frames, in the context of the text typed so far.
    async fn recognize(
        &self,
        frames: &[serde_json::Value],
        current_text: &str,
    ) -> ServiceResult<Recognition>;

    /// Restore Vietnamese diacritics on raw text.
    async fn fix_diacritics(&self, text: &str) -> ServiceResult<String>;
}
