//! Member-facing favorites, search history and reports, plus admin report handling.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::{DictionaryEntryId, ReportId};
use crate::domains::favorites::{actions as favorites, FavoritePage};
use crate::domains::history::{actions as history, SearchHistoryEntry};
use crate::domains::reports::{actions as reports, Report};
use crate::server::app::AppState;
use crate::server::middleware::{RequireAdmin, RequireUser};
use crate::server::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub entry_id: DictionaryEntryId,
    pub is_favorite: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[serde(alias = "entry_id", alias = "wordId")]
    pub entry_id: DictionaryEntryId,
    pub reason: String,
}

pub async fn toggle_favorite_handler(
    RequireUser(user): RequireUser,
    Extension(state): Extension<AppState>,
    Path(entry_id): Path<DictionaryEntryId>,
) -> ApiResult<Json<ApiResponse<FavoriteStatus>>> {
    let is_favorite = favorites::toggle_favorite(user.member_id, entry_id, &state.deps).await?;
    let message = if is_favorite {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    Ok(ApiResponse::ok(message, FavoriteStatus { entry_id, is_favorite }))
}

pub async fn list_favorites_handler(
    RequireUser(user): RequireUser,
    Extension(state): Extension<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<ApiResponse<FavoritePage>>> {
    let page = favorites::list_favorites(
        user.member_id,
        params.page.unwrap_or(0),
        params.size.unwrap_or(favorites::DEFAULT_PAGE_SIZE),
        &state.deps,
    )
    .await?;
    Ok(ApiResponse::ok("Favorites", page))
}

pub async fn favorite_status_handler(
    RequireUser(user): RequireUser,
    Extension(state): Extension<AppState>,
    Path(entry_id): Path<DictionaryEntryId>,
) -> ApiResult<Json<ApiResponse<FavoriteStatus>>> {
    let is_favorite = favorites::is_favorite(user.member_id, entry_id, &state.deps).await?;
    Ok(ApiResponse::ok("Favorite status", FavoriteStatus { entry_id, is_favorite }))
}

pub async fn search_history_handler(
    RequireUser(user): RequireUser,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<SearchHistoryEntry>>>> {
    let entries = history::list_history(user.member_id, &state.deps).await?;
    Ok(ApiResponse::ok(
        format!("Retrieved {} history entries", entries.len()),
        entries,
    ))
}

pub async fn create_report_handler(
    RequireUser(user): RequireUser,
    Extension(state): Extension<AppState>,
    Json(input): Json<ReportInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Report>>)> {
    let report =
        reports::create_report(user.member_id, input.entry_id, &input.reason, &state.deps).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Report submitted", report)))
}

pub async fn list_open_reports_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Report>>>> {
    let open = reports::list_open_reports(&state.deps).await?;
    Ok(ApiResponse::ok(format!("{} open reports", open.len()), open))
}

pub async fn resolve_report_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
    Path(id): Path<ReportId>,
) -> ApiResult<Json<ApiResponse<Report>>> {
    let report = reports::resolve_report(id, &state.deps).await?;
    Ok(ApiResponse::ok("Report resolved", report))
}
