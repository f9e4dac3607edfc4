//! Contribution submission (members) and review (admins).

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::ContributionId;
use crate::domains::dictionary::DictionaryEntryData;
use crate::domains::moderation::actions;
use crate::domains::moderation::{ContributionData, ContributionStatus, DashboardStats, StagingPayload};
use crate::server::app::AppState;
use crate::server::middleware::{RequireAdmin, RequireUser};
use crate::server::response::{ApiError, ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
}

/// Approved contribution together with the entry it produced
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalResult {
    pub contribution: ContributionData,
    pub entry: DictionaryEntryData,
}

pub async fn submit_contribution_handler(
    RequireUser(user): RequireUser,
    Extension(state): Extension<AppState>,
    Json(payload): Json<StagingPayload>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ContributionData>>)> {
    let contribution = actions::submit_contribution(user.member_id, payload, &state.deps).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok("Contribution submitted for review", contribution.into()),
    ))
}

pub async fn list_contributions_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
    Query(params): Query<StatusParams>,
) -> ApiResult<Json<ApiResponse<Vec<ContributionData>>>> {
    let status = match params.status.as_deref() {
        Some(raw) => raw
            .parse::<ContributionStatus>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => ContributionStatus::Pending,
    };

    let contributions = actions::get_by_status(status, &state.deps).await?;
    Ok(ApiResponse::ok(
        format!("{} contributions", contributions.len()),
        contributions.into_iter().map(ContributionData::from).collect(),
    ))
}

pub async fn get_contribution_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
    Path(id): Path<ContributionId>,
) -> ApiResult<Json<ApiResponse<ContributionData>>> {
    let contribution = actions::get_by_id(id, &state.deps).await?;
    Ok(ApiResponse::ok("Contribution found", contribution.into()))
}

pub async fn approve_contribution_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
    Path(id): Path<ContributionId>,
) -> ApiResult<Json<ApiResponse<ApprovalResult>>> {
    let approved = actions::approve_contribution(id, &state.deps).await?;
    Ok(ApiResponse::ok(
        "Contribution approved",
        ApprovalResult {
            contribution: approved.contribution.into(),
            entry: approved.entry.into(),
        },
    ))
}

pub async fn reject_contribution_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
    Path(id): Path<ContributionId>,
) -> ApiResult<Json<ApiResponse<ContributionData>>> {
    let contribution = actions::reject_contribution(id, &state.deps).await?;
    Ok(ApiResponse::ok("Contribution rejected", contribution.into()))
}

pub async fn dashboard_stats_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    let stats = actions::get_dashboard_stats(&state.deps).await?;
    Ok(ApiResponse::ok("Dashboard statistics", stats))
}
