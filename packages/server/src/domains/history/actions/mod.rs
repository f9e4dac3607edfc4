//! Search history actions

use tracing::{debug, warn};

use crate::common::{DictionaryEntryId, MemberId, ServiceError, ServiceResult};
use crate::domains::history::models::{SearchHistory, SearchHistoryEntry};
use crate::domains::member::Member;
use crate::kernel::ServerDeps;

/// Most recent lookups returned by [`list_history`].
pub const HISTORY_LIMIT: i64 = 100;

/// Record that `member_id` found `entry_id` by searching for `query`.
///
/// Guests are skipped. Never fails: a lookup must not break because its
/// history could not be written.
pub async fn log_search(
    member_id: Option<MemberId>,
    query: &str,
    entry_id: DictionaryEntryId,
    deps: &ServerDeps,
) {
    let Some(member_id) = member_id else {
        debug!("Skipping search history for guest");
        return;
    };
    let query = query.trim();
    if query.is_empty() {
        return;
    }

    match SearchHistory::insert(member_id, entry_id, query, &deps.db_pool).await {
        Ok(_) => debug!(member_id = %member_id, entry_id = %entry_id, query = %query, "Search history logged"),
        Err(e) => warn!(member_id = %member_id, entry_id = %entry_id, error = %e, "Failed to log search history"),
    }
}

/// A member's lookups, newest first.
pub async fn list_history(
    member_id: MemberId,
    deps: &ServerDeps,
) -> ServiceResult<Vec<SearchHistoryEntry>> {
    if !Member::exists(member_id, &deps.db_pool).await? {
        return Err(ServiceError::not_found("Member", member_id));
    }
    Ok(SearchHistory::find_for_member(member_id, HISTORY_LIMIT, &deps.db_pool).await?)
}
