use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{DictionaryEntryId, FavoriteId, MemberId};

/// Favorite - a member's bookmark on a dictionary entry
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Favorite {
    pub id: FavoriteId,
    pub member_id: MemberId,
    pub entry_id: DictionaryEntryId,
    pub saved_at: DateTime<Utc>,
}

/// A favorited entry joined with its dictionary content
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub entry_id: DictionaryEntryId,
    pub word: String,
    pub definition: Option<String>,
    pub video_url: String,
    pub saved_at: DateTime<Utc>,
}

impl Favorite {
    pub async fn exists(member_id: MemberId, entry_id: DictionaryEntryId, pool: &PgPool) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE member_id = $1 AND entry_id = $2)",
        )
        .bind(member_id)
        .bind(entry_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Returns false if the favorite already existed
    pub async fn insert(member_id: MemberId, entry_id: DictionaryEntryId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (id, member_id, entry_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (member_id, entry_id) DO NOTHING
            "#,
        )
        .bind(FavoriteId::new())
        .bind(member_id)
        .bind(entry_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false if there was nothing to delete
    pub async fn delete(member_id: MemberId, entry_id: DictionaryEntryId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE member_id = $1 AND entry_id = $2")
            .bind(member_id)
            .bind(entry_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Newest favorites first
    pub async fn find_entries_for_member(
        member_id: MemberId,
        limit: i64,
        offset: i64,
        pool: &PgPool,
    ) -> Result<Vec<FavoriteEntry>> {
        sqlx::query_as::<_, FavoriteEntry>(
            r#"
            SELECT d.id AS entry_id, d.word, d.definition, d.video_url, f.saved_at
            FROM favorites f
            JOIN dictionary_entries d ON d.id = f.entry_id
            WHERE f.member_id = $1
            ORDER BY f.saved_at DESC, f.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(member_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_for_member(member_id: MemberId, pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE member_id = $1")
            .bind(member_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
