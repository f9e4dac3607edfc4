//! Dictionary routes: public reads and admin writes.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::DictionaryEntryId;
use crate::domains::dictionary::actions;
use crate::domains::dictionary::{DictionaryEntry, DictionaryEntryData, NewDictionaryEntry};
use crate::domains::history::actions as history;
use crate::server::app::AppState;
use crate::server::middleware::{AuthUser, RequireAdmin};
use crate::server::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LatestParams {
    pub limit: Option<i64>,
}

/// Public search. For signed-in members the top hit is logged to their history.
pub async fn search_handler(
    Extension(state): Extension<AppState>,
    user: Option<Extension<AuthUser>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<ApiResponse<Vec<DictionaryEntryData>>>> {
    let query = params.query.as_deref();
    let results = actions::search(query, &state.deps).await?;

    if let (Some(query), Some(top)) = (query, results.first()) {
        let member_id = user.map(|Extension(user)| user.member_id);
        history::log_search(member_id, query, top.id, &state.deps).await;
    }

    Ok(ApiResponse::ok(format!("Found {} results", results.len()), results))
}

pub async fn latest_handler(
    Extension(state): Extension<AppState>,
    Query(params): Query<LatestParams>,
) -> ApiResult<Json<ApiResponse<Vec<DictionaryEntryData>>>> {
    let limit = params.limit.unwrap_or(actions::DEFAULT_LATEST_LIMIT);
    let entries = actions::get_latest(limit, &state.deps).await?;
    Ok(ApiResponse::ok(
        "Latest words",
        entries.into_iter().map(DictionaryEntryData::from).collect(),
    ))
}

pub async fn random_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<ApiResponse<DictionaryEntryData>>> {
    let entry = actions::get_random(&state.deps).await?;
    Ok(ApiResponse::ok("Random word", entry.into()))
}

pub async fn get_entry_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<DictionaryEntryId>,
) -> ApiResult<Json<ApiResponse<DictionaryEntryData>>> {
    let entry = actions::get_by_id(id, &state.deps).await?;
    Ok(ApiResponse::ok("Word found", entry.into()))
}

pub async fn list_entries_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<DictionaryEntry>>>> {
    let entries = actions::list_all(&state.deps).await?;
    Ok(ApiResponse::ok(format!("{} words", entries.len()), entries))
}

pub async fn create_entry_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
    Json(input): Json<NewDictionaryEntry>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DictionaryEntry>>)> {
    let entry = actions::create_word(input, &state.deps).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok("Word created", entry)))
}

pub async fn update_entry_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
    Path(id): Path<DictionaryEntryId>,
    Json(input): Json<NewDictionaryEntry>,
) -> ApiResult<Json<ApiResponse<DictionaryEntry>>> {
    let entry = actions::update_word(id, input, &state.deps).await?;
    Ok(ApiResponse::ok("Word updated", entry))
}

pub async fn delete_entry_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
    Path(id): Path<DictionaryEntryId>,
) -> ApiResult<Json<ApiResponse<DictionaryEntryId>>> {
    actions::delete_word(id, &state.deps).await?;
    Ok(ApiResponse::ok("Word deleted", id))
}

pub async fn reindex_handler(
    RequireAdmin(_admin): RequireAdmin,
    Extension(state): Extension<AppState>,
) -> ApiResult<Json<ApiResponse<usize>>> {
    let scheduled = actions::rebuild_search_index(&state.deps).await?;
    Ok(ApiResponse::ok(
        format!("{} words scheduled for indexing", scheduled),
        scheduled,
    ))
}
