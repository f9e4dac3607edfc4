//! Gesture recognition proxy routes.

use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::domains::recognition::{actions, DiacriticsInput, GestureInput};
use crate::kernel::Recognition;
use crate::server::app::AppState;
use crate::server::response::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiacriticsResult {
    pub original_text: String,
    pub fixed_text: String,
}

pub async fn predict_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<GestureInput>,
) -> ApiResult<Json<ApiResponse<Recognition>>> {
    let recognition = actions::recognize_gesture(input, &state.deps).await?;
    Ok(ApiResponse::ok("Gesture recognized", recognition))
}

pub async fn fix_diacritics_handler(
    Extension(state): Extension<AppState>,
    Json(input): Json<DiacriticsInput>,
) -> ApiResult<Json<ApiResponse<DiacriticsResult>>> {
    let fixed_text = actions::fix_diacritics(&input.text, &state.deps).await?;
    Ok(ApiResponse::ok(
        "Diacritics restored",
        DiacriticsResult {
            original_text: input.text,
            fixed_text,
        },
    ))
}
