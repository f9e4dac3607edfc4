//! Dictionary search with silent fallback to Postgres.

use tracing::{debug, warn};

use crate::common::ServiceResult;
use crate::domains::dictionary::data::DictionaryEntryData;
use crate::domains::dictionary::models::DictionaryEntry;
use crate::kernel::{ServerDeps, SEARCH_RESULT_LIMIT};

/// Search the dictionary by word or definition.
///
/// A blank or missing query returns no results. The search index is tried
/// first; an index error, a timeout or an empty result all fall back to a
/// case-insensitive substring match in Postgres. Index trouble is never
/// surfaced to the caller.
pub async fn search(query: Option<&str>, deps: &ServerDeps) -> ServiceResult<Vec<DictionaryEntryData>> {
    let query = match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => q,
        None => return Ok(Vec::new()),
    };

    let indexed = tokio::time::timeout(
        deps.search_timeout,
        deps.search_index.search(query, SEARCH_RESULT_LIMIT),
    )
    .await;

    match indexed {
        Ok(Ok(hits)) if !hits.is_empty() => {
            debug!(query = %query, hits = hits.len(), "Served search from index");
            return Ok(hits.into_iter().map(DictionaryEntryData::from).collect());
        }
        Ok(Ok(_)) => {
            debug!(query = %query, "Search index returned no hits, falling back to Postgres");
        }
        Ok(Err(e)) => {
            warn!(query = %query, error = %e, "Search index failed, falling back to Postgres");
        }
        Err(_) => {
            warn!(
                query = %query,
                timeout_ms = deps.search_timeout.as_millis() as u64,
                "Search index timed out, falling back to Postgres"
            );
        }
    }

    let entries = DictionaryEntry::search_by_query(query, &deps.db_pool).await?;
    Ok(entries.into_iter().map(DictionaryEntryData::from).collect())
}
