//! Index catch-up: reconciliation sweep and full rebuild.

use std::time::Duration;

use tracing::{info, warn};

use crate::common::{ServiceError, ServiceResult};
use crate::domains::dictionary::models::DictionaryEntry;
use crate::kernel::ServerDeps;

/// Re-queue up to `batch_size` entries whose sync flag is still false.
///
/// Returns the number of entries handed to the propagator.
pub async fn reconcile_unsynced(deps: &ServerDeps, batch_size: i64) -> ServiceResult<usize> {
    let entries = DictionaryEntry::find_unsynced(batch_size.max(1), &deps.db_pool).await?;
    let scheduled = entries.len();

    for entry in entries {
        deps.sync.schedule(entry);
    }

    Ok(scheduled)
}

/// Lower bound for emptying the index; large indexes take a while to clear.
const CLEAR_TIMEOUT: Duration = Duration::from_secs(30);

/// Rebuild the index from Postgres.
///
/// The index is disposable, so this is the recovery path after it was wiped,
/// replaced or drifted. It is emptied first, which drops documents whose rows
/// no longer exist, then every entry is flagged unsynced and pushed again.
/// Searches fall back to Postgres while it refills. Returns the number of
/// entries scheduled.
pub async fn rebuild_search_index(deps: &ServerDeps) -> ServiceResult<usize> {
    match tokio::time::timeout(deps.search_timeout, deps.search_index.ensure_index()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Could not prepare search index before rebuild"),
        Err(_) => warn!("Timed out preparing search index before rebuild"),
    }

    let clear_timeout = deps.search_timeout.max(CLEAR_TIMEOUT);
    match tokio::time::timeout(clear_timeout, deps.search_index.clear()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            return Err(ServiceError::ExternalServiceUnavailable(format!(
                "Could not clear search index: {}",
                e
            )))
        }
        Err(_) => {
            return Err(ServiceError::ExternalServiceUnavailable(
                "Timed out clearing search index".to_string(),
            ))
        }
    }

    let reset = DictionaryEntry::mark_all_unsynced(&deps.db_pool).await?;
    info!(reset, "Search index cleared, sync flags reset");

    let entries = DictionaryEntry::find_all(&deps.db_pool).await?;
    let scheduled = entries.len();
    for entry in entries {
        deps.sync.schedule(entry);
    }

    info!(scheduled, "Search index rebuild scheduled");
    Ok(scheduled)
}
