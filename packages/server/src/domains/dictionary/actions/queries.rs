//! Dictionary query actions (Postgres only)

use super::{DEFAULT_LATEST_LIMIT, MAX_LATEST_LIMIT};
use crate::common::{DictionaryEntryId, ServiceError, ServiceResult};
use crate::domains::dictionary::models::DictionaryEntry;
use crate::kernel::ServerDeps;

pub async fn get_by_id(id: DictionaryEntryId, deps: &ServerDeps) -> ServiceResult<DictionaryEntry> {
    DictionaryEntry::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("DictionaryEntry", id))
}

/// A random entry, for the "word of the moment" feature.
pub async fn get_random(deps: &ServerDeps) -> ServiceResult<DictionaryEntry> {
    DictionaryEntry::find_random(&deps.db_pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("DictionaryEntry", "dictionary is empty"))
}

/// Out-of-range limits fall back to the default instead of failing.
pub fn normalize_latest_limit(limit: i64) -> i64 {
    if (1..=MAX_LATEST_LIMIT).contains(&limit) {
        limit
    } else {
        DEFAULT_LATEST_LIMIT
    }
}

pub async fn get_latest(limit: i64, deps: &ServerDeps) -> ServiceResult<Vec<DictionaryEntry>> {
    let entries =
        DictionaryEntry::find_latest(normalize_latest_limit(limit), &deps.db_pool).await?;
    Ok(entries)
}

/// Every entry, newest first (admin listing).
pub async fn list_all(deps: &ServerDeps) -> ServiceResult<Vec<DictionaryEntry>> {
    Ok(DictionaryEntry::find_all(&deps.db_pool).await?)
}
