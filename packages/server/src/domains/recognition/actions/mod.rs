//! Recognition actions

use tracing::info;

use crate::common::{ServiceError, ServiceResult};
use crate::domains::recognition::data::GestureInput;
use crate::kernel::{Recognition, ServerDeps};

/// Recognize the next character and return the updated, accent-restored text.
pub async fn recognize_gesture(input: GestureInput, deps: &ServerDeps) -> ServiceResult<Recognition> {
    if input.frames.is_empty() {
        return Err(ServiceError::Validation("Frames cannot be empty".to_string()));
    }

    let current_text = input.current_text.unwrap_or_default();
    info!(frames = input.frames.len(), current_text = %current_text, "Gesture recognition requested");

    deps.gesture.recognize(&input.frames, &current_text).await
}

pub async fn fix_diacritics(text: &str, deps: &ServerDeps) -> ServiceResult<String> {
    if text.trim().is_empty() {
        return Err(ServiceError::Validation("Text is required".to_string()));
    }
    deps.gesture.fix_diacritics(text).await
}
