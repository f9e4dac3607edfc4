//! Dictionary write actions (Postgres first, then propagate)
//!
//! Each public write runs through [`ServerDeps::run_detached`], so a caller that
//! goes away mid-request cannot leave a commit without its propagation.

use sqlx::PgConnection;
use tracing::{info, warn};

use super::MAX_WORD_LENGTH;
use crate::common::{is_duplicate_key, DictionaryEntryId, ServiceError, ServiceResult};
use crate::domains::dictionary::models::{DictionaryEntry, NewDictionaryEntry};
use crate::kernel::ServerDeps;

/// Trim the input and check the fields every entry needs.
pub fn validate_entry(input: NewDictionaryEntry) -> ServiceResult<NewDictionaryEntry> {
    let word = input.word.trim().to_string();
    if word.is_empty() {
        return Err(ServiceError::Validation("Word is required".to_string()));
    }
    if word.chars().count() > MAX_WORD_LENGTH {
        return Err(ServiceError::Validation(format!(
            "Word must be at most {} characters",
            MAX_WORD_LENGTH
        )));
    }

    let video_url = input.video_url.trim().to_string();
    if video_url.is_empty() {
        return Err(ServiceError::Validation("Video URL is required".to_string()));
    }

    let definition = input
        .definition
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(NewDictionaryEntry {
        word,
        definition,
        video_url,
    })
}

/// Insert a validated entry on the given connection, mapping any case-insensitive
/// clash to `DuplicateWord`.
///
/// Takes a connection so moderation can run it inside its own transaction.
/// Does not schedule propagation; callers do that after commit.
pub async fn insert_word(
    input: &NewDictionaryEntry,
    conn: &mut PgConnection,
) -> ServiceResult<DictionaryEntry> {
    if DictionaryEntry::exists_by_word(&input.word, &mut *conn).await? {
        return Err(ServiceError::DuplicateWord(input.word.clone()));
    }

    // Two concurrent creates can both pass the pre-check; the unique index decides.
    DictionaryEntry::insert(input, &mut *conn)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                ServiceError::DuplicateWord(input.word.clone())
            } else {
                ServiceError::Internal(e)
            }
        })
}

/// Create an entry. Returns once Postgres holds it; index visibility follows later.
pub async fn create_word(
    input: NewDictionaryEntry,
    deps: &ServerDeps,
) -> ServiceResult<DictionaryEntry> {
    deps.run_detached(move |deps| async move { create(input, &deps).await })
        .await
}

async fn create(input: NewDictionaryEntry, deps: &ServerDeps) -> ServiceResult<DictionaryEntry> {
    let input = validate_entry(input)?;

    let mut conn = deps.db_pool.acquire().await?;
    let entry = insert_word(&input, &mut conn).await?;

    info!(entry_id = %entry.id, word = %entry.word, "Dictionary entry created");
    deps.sync.schedule(entry.clone());
    Ok(entry)
}

/// Overwrite an entry. Resets the sync flag and re-propagates.
pub async fn update_word(
    id: DictionaryEntryId,
    input: NewDictionaryEntry,
    deps: &ServerDeps,
) -> ServiceResult<DictionaryEntry> {
    deps.run_detached(move |deps| async move { update(id, input, &deps).await })
        .await
}

async fn update(
    id: DictionaryEntryId,
    input: NewDictionaryEntry,
    deps: &ServerDeps,
) -> ServiceResult<DictionaryEntry> {
    let input = validate_entry(input)?;

    let entry = DictionaryEntry::update(id, &input, &deps.db_pool)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                ServiceError::DuplicateWord(input.word.clone())
            } else {
                ServiceError::Internal(e)
            }
        })?
        .ok_or_else(|| ServiceError::not_found("DictionaryEntry", id))?;

    info!(entry_id = %entry.id, word = %entry.word, "Dictionary entry updated");
    deps.sync.schedule(entry.clone());
    Ok(entry)
}

/// Delete an entry from the index (best effort) and then from Postgres.
pub async fn delete_word(id: DictionaryEntryId, deps: &ServerDeps) -> ServiceResult<()> {
    deps.run_detached(move |deps| async move { delete(id, &deps).await })
        .await
}

async fn delete(id: DictionaryEntryId, deps: &ServerDeps) -> ServiceResult<()> {
    // Held until the row is gone, so no propagation can re-add the document.
    let _entry_lock = deps.sync.lock_entry(id).await;

    let entry = DictionaryEntry::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("DictionaryEntry", id))?;

    match tokio::time::timeout(deps.search_timeout, deps.search_index.delete(id)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(entry_id = %id, error = %e, "Failed to delete entry from search index")
        }
        Err(_) => warn!(entry_id = %id, "Timed out deleting entry from search index"),
    }

    DictionaryEntry::delete(id, &deps.db_pool).await?;
    info!(entry_id = %id, word = %entry.word, "Dictionary entry deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(word: &str, definition: Option<&str>, video_url: &str) -> NewDictionaryEntry {
        NewDictionaryEntry {
            word: word.to_string(),
            definition: definition.map(String::from),
            video_url: video_url.to_string(),
        }
    }

    #[test]
    fn test_validate_trims_fields() {
        let entry = validate_entry(input("  xin chào ", Some("  "), " http://x/v.mp4 ")).unwrap();
        assert_eq!(entry.word, "xin chào");
        assert_eq!(entry.definition, None);
        assert_eq!(entry.video_url, "http://x/v.mp4");
    }

    #[test]
    fn test_validate_rejects_blank_word_and_media() {
        assert!(matches!(
            validate_entry(input("   ", None, "http://x/v.mp4")),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            validate_entry(input("xin chào", None, "")),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        // 100 multi-byte characters is still within the limit
        let word: String = "ả".repeat(MAX_WORD_LENGTH);
        assert!(validate_entry(input(&word, None, "http://x/v.mp4")).is_ok());

        let too_long: String = "a".repeat(MAX_WORD_LENGTH + 1);
        assert!(validate_entry(input(&too_long, None, "http://x/v.mp4")).is_err());
    }
}
