//! Moderation query actions
//!
//! Admin auth is checked at the route layer.

use futures::try_join;

use crate::common::{ContributionId, ServiceError, ServiceResult};
use crate::domains::dictionary::models::DictionaryEntry;
use crate::domains::member::Member;
use crate::domains::moderation::data::DashboardStats;
use crate::domains::moderation::models::{Contribution, ContributionStatus};
use crate::kernel::ServerDeps;

pub async fn get_by_status(
    status: ContributionStatus,
    deps: &ServerDeps,
) -> ServiceResult<Vec<Contribution>> {
    Ok(Contribution::find_by_status(status, &deps.db_pool).await?)
}

pub async fn get_by_id(id: ContributionId, deps: &ServerDeps) -> ServiceResult<Contribution> {
    Contribution::find_by_id(id, &deps.db_pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("Contribution", id))
}

pub async fn count_by_status(status: ContributionStatus, deps: &ServerDeps) -> ServiceResult<i64> {
    Ok(Contribution::count_by_status(status, &deps.db_pool).await?)
}

pub async fn get_dashboard_stats(deps: &ServerDeps) -> ServiceResult<DashboardStats> {
    let pool = &deps.db_pool;

    let (total_members, total_words, pending_contributions, unsynced_entries) = try_join!(
        Member::count(pool),
        DictionaryEntry::count(pool),
        Contribution::count_by_status(ContributionStatus::Pending, pool),
        DictionaryEntry::count_unsynced(pool),
    )?;

    Ok(DashboardStats {
        total_members,
        total_words,
        pending_contributions,
        unsynced_entries,
    })
}
