use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{DictionaryEntryId, MemberId, SearchHistoryId};

/// One logged lookup: the query a member typed and the entry it led to
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchHistory {
    pub id: SearchHistoryId,
    pub member_id: MemberId,
    pub entry_id: DictionaryEntryId,
    pub search_query: String,
    pub searched_at: DateTime<Utc>,
}

/// History row joined with the word it points at
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    pub id: SearchHistoryId,
    pub entry_id: DictionaryEntryId,
    pub word: String,
    pub search_query: String,
    pub searched_at: DateTime<Utc>,
}

impl SearchHistory {
    pub async fn insert(
        member_id: MemberId,
        entry_id: DictionaryEntryId,
        search_query: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO search_history (id, member_id, entry_id, search_query)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(SearchHistoryId::new())
        .bind(member_id)
        .bind(entry_id)
        .bind(search_query)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest first
    pub async fn find_for_member(
        member_id: MemberId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<SearchHistoryEntry>> {
        sqlx::query_as::<_, SearchHistoryEntry>(
            r#"
            SELECT h.id, h.entry_id, d.word, h.search_query, h.searched_at
            FROM search_history h
            JOIN dictionary_entries d ON d.id = h.entry_id
            WHERE h.member_id = $1
            ORDER BY h.searched_at DESC, h.id DESC
            LIMIT $2
            "#,
        )
        .bind(member_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
