use serde::{Deserialize, Serialize};

use crate::common::{ServiceError, ServiceResult};
use crate::domains::dictionary::actions::validate_entry;
use crate::domains::dictionary::models::NewDictionaryEntry;

/// Candidate dictionary entry stored in `contributions.staging_data`.
///
/// Serialized as `{"word", "definition", "videoUrl"}`. Older payloads spelled
/// the media field `media` or `video_url`; both still parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagingPayload {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(alias = "media", alias = "video_url")]
    pub video_url: String,
}

impl StagingPayload {
    pub fn parse(raw: &str) -> ServiceResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| ServiceError::InvalidPayload(format!("Unreadable staging data: {}", e)))
    }

    pub fn to_json(&self) -> ServiceResult<String> {
        serde_json::to_string(self).map_err(|e| ServiceError::Internal(e.into()))
    }

    /// Validated dictionary input. Any missing field is a payload problem.
    pub fn into_entry(self) -> ServiceResult<NewDictionaryEntry> {
        validate_entry(NewDictionaryEntry {
            word: self.word,
            definition: self.definition,
            video_url: self.video_url,
        })
        .map_err(|e| match e {
            ServiceError::Validation(message) => ServiceError::InvalidPayload(message),
            other => other,
        })
    }
}

impl From<NewDictionaryEntry> for StagingPayload {
    fn from(entry: NewDictionaryEntry) -> Self {
        Self {
            word: entry.word,
            definition: entry.definition,
            video_url: entry.video_url,
        }
    }
}
