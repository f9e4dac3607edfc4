//! Report actions

use tracing::info;

use crate::common::{DictionaryEntryId, MemberId, ReportId, ServiceError, ServiceResult};
use crate::domains::dictionary::models::DictionaryEntry;
use crate::domains::member::Member;
use crate::domains::reports::models::{Report, ReportStatus};
use crate::kernel::ServerDeps;

pub async fn create_report(
    member_id: MemberId,
    entry_id: DictionaryEntryId,
    reason: &str,
    deps: &ServerDeps,
) -> ServiceResult<Report> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ServiceError::Validation("Reason is required".to_string()));
    }
    if !Member::exists(member_id, &deps.db_pool).await? {
        return Err(ServiceError::not_found("Member", member_id));
    }
    if DictionaryEntry::find_by_id(entry_id, &deps.db_pool).await?.is_none() {
        return Err(ServiceError::not_found("DictionaryEntry", entry_id));
    }

    let report = Report::create(member_id, entry_id, reason, &deps.db_pool).await?;
    info!(report_id = %report.id, entry_id = %entry_id, "Report created");
    Ok(report)
}

pub async fn list_open_reports(deps: &ServerDeps) -> ServiceResult<Vec<Report>> {
    Ok(Report::find_by_status(ReportStatus::Open, &deps.db_pool).await?)
}

pub async fn resolve_report(id: ReportId, deps: &ServerDeps) -> ServiceResult<Report> {
    if let Some(report) = Report::resolve(id, &deps.db_pool).await? {
        info!(report_id = %id, "Report resolved");
        return Ok(report);
    }

    match Report::find_by_id(id, &deps.db_pool).await? {
        Some(_) => Err(ServiceError::InvalidState(format!(
            "Report {} is already resolved",
            id
        ))),
        None => Err(ServiceError::not_found("Report", id)),
    }
}
