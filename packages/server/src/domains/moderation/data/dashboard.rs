use serde::{Deserialize, Serialize};

/// Admin dashboard counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_members: i64,
    pub total_words: i64,
    pub pending_contributions: i64,
    /// Entries the search index does not reflect yet
    pub unsynced_entries: i64,
}
