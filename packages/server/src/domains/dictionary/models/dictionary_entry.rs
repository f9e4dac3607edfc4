use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};

use crate::common::DictionaryEntryId;
use crate::kernel::SearchDocument;

/// Canonical dictionary entry. Postgres is the source of truth.
///
/// `synced` is advisory: it is true once the search index holds the version of
/// the entry identified by `updated_at`. Any mutation resets it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DictionaryEntry {
    pub id: DictionaryEntryId,
    pub word: String,
    pub definition: Option<String>,
    pub video_url: String,
    pub synced: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written on create/update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDictionaryEntry {
    pub word: String,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(alias = "video_url", alias = "media")]
    pub video_url: String,
}

impl From<&DictionaryEntry> for SearchDocument {
    fn from(entry: &DictionaryEntry) -> Self {
        Self {
            id: entry.id,
            word: entry.word.clone(),
            definition: entry.definition.clone(),
            video_url: entry.video_url.clone(),
        }
    }
}

/// Escape LIKE metacharacters so user input only ever matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl DictionaryEntry {
    pub async fn find_by_id(id: DictionaryEntryId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM dictionary_entries WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Case-insensitive existence check on `word`.
    ///
    /// Only a pre-check; the unique index on `lower(word)` is what actually
    /// closes the race between concurrent creates. Both fold case under the
    /// ICU root collation so the result does not depend on the database locale.
    pub async fn exists_by_word<'e, E>(word: &str, executor: E) -> Result<bool>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM dictionary_entries
                WHERE LOWER(word COLLATE "und-x-icu") = LOWER($1 COLLATE "und-x-icu")
            )
            "#,
        )
        .bind(word)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    /// Case-insensitive substring match over word and definition.
    pub async fn search_by_query(query: &str, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM dictionary_entries
            WHERE word COLLATE "und-x-icu" ILIKE $1 ESCAPE '\'
               OR definition COLLATE "und-x-icu" ILIKE $1 ESCAPE '\'
            ORDER BY word
            "#,
        )
        .bind(like_pattern(query))
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_random(pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM dictionary_entries ORDER BY RANDOM() LIMIT 1")
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Newest entries first.
    pub async fn find_latest(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM dictionary_entries ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM dictionary_entries ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Entries the index does not reflect yet, longest-waiting first.
    pub async fn find_unsynced(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM dictionary_entries
            WHERE synced = false
            ORDER BY updated_at
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new entry with `synced = false`.
    pub async fn insert<'e, E>(input: &NewDictionaryEntry, executor: E) -> Result<Self>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO dictionary_entries (id, word, definition, video_url, synced)
            VALUES ($1, $2, $3, $4, false)
            RETURNING *
            "#,
        )
        .bind(DictionaryEntryId::new())
        .bind(&input.word)
        .bind(&input.definition)
        .bind(&input.video_url)
        .fetch_one(executor)
        .await
        .map_err(Into::into)
    }

    /// Overwrite the entry's content. Resets `synced` and bumps `updated_at`.
    ///
    /// Returns `None` when the entry does not exist.
    pub async fn update(
        id: DictionaryEntryId,
        input: &NewDictionaryEntry,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE dictionary_entries
            SET word = $2,
                definition = $3,
                video_url = $4,
                synced = false,
                updated_at = clock_timestamp()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.word)
        .bind(&input.definition)
        .bind(&input.video_url)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Flip `synced` for the version that was pushed to the index.
    ///
    /// Returns false when the row changed (or vanished) since that version was
    /// read, so a slow propagation never marks newer content as synced.
    pub async fn mark_synced(
        id: DictionaryEntryId,
        version: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE dictionary_entries SET synced = true WHERE id = $1 AND updated_at = $2",
        )
        .bind(id)
        .bind(version)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Forget every sync flag, after the index was emptied.
    pub async fn mark_all_unsynced(pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("UPDATE dictionary_entries SET synced = false WHERE synced")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(id: DictionaryEntryId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM dictionary_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dictionary_entries")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn count_unsynced(pool: &PgPool) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM dictionary_entries WHERE synced = false")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_wraps_query() {
        assert_eq!(like_pattern("chào"), "%chào%");
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
