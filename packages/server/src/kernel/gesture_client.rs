//! HTTP client for the external gesture-recognition service.
//!
//! The service takes a window of hand-landmark frames plus the text typed so
//! far, recognizes the next character and returns the updated text with
//! Vietnamese diacritics restored. It also exposes `/fix-diacritics` for raw text.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::common::{ServiceError, ServiceResult};
use crate::kernel::{BaseGestureRecognizer, Recognition};

pub struct GestureServiceClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct RecognizeRequest<'a> {
    frames: &'a [serde_json::Value],
    current_text: &'a str,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    success: Option<bool>,
    predicted_word: Option<String>,
    confidence: Option<f32>,
    raw_char: Option<String>,
    error: Option<String>,
}

#[derive(Serialize)]
struct FixDiacriticsRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct FixDiacriticsResponse {
    fixed_text: Option<String>,
}

impl GestureServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(base_url).context("AI_SERVICE_URL is not a valid URL")?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build gesture service HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<B, R>(&self, url: String, body: &B) -> ServiceResult<R>
    where
        B: Serialize + ?Sized,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "AI service returned error status");
            return Err(ServiceError::ExternalService {
                status: status.as_u16(),
                message: format!("AI service error: {}", status),
            });
        }

        response.json::<R>().await.map_err(|e| ServiceError::ExternalService {
            status: 500,
            message: format!("AI service returned an unreadable response: {}", e),
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> ServiceError {
    if err.is_connect() || err.is_timeout() {
        error!(error = %err, "AI service is unavailable");
        ServiceError::ExternalServiceUnavailable("AI service is offline".to_string())
    } else {
        ServiceError::Internal(anyhow!(err).context("Failed to call AI service"))
    }
}

/// Turn the raw service reply into a recognition, rejecting unsuccessful replies.
fn into_recognition(body: RecognizeResponse) -> ServiceResult<Recognition> {
    if body.success == Some(false) || body.error.is_some() {
        let message = body
            .error
            .unwrap_or_else(|| "AI service returned unsuccessful response".to_string());
        error!(error = %message, "AI service rejected gesture");
        return Err(ServiceError::ExternalService {
            status: 500,
            message: format!("AI service error: {}", message),
        });
    }

    let predicted_word = body
        .predicted_word
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .ok_or_else(|| ServiceError::ExternalService {
            status: 500,
            message: "AI service returned empty predicted_word".to_string(),
        })?;

    Ok(Recognition {
        predicted_word,
        confidence: body.confidence,
        raw_char: body.raw_char,
    })
}

#[async_trait]
impl BaseGestureRecognizer for GestureServiceClient {
    async fn recognize(
        &self,
        frames: &[serde_json::Value],
        current_text: &str,
    ) -> ServiceResult<Recognition> {
        if frames.is_empty() {
            return Err(ServiceError::Validation("Frames cannot be empty".to_string()));
        }

        debug!(frames = frames.len(), current_text = %current_text, "Calling gesture service");

        let body: RecognizeResponse = self
            .post_json(
                self.base_url.clone(),
                &RecognizeRequest {
                    frames,
                    current_text,
                },
            )
            .await?;

        let recognition = into_recognition(body)?;
        info!(
            predicted_word = %recognition.predicted_word,
            confidence = ?recognition.confidence,
            raw_char = ?recognition.raw_char,
            "Gesture recognized"
        );
        Ok(recognition)
    }

    async fn fix_diacritics(&self, text: &str) -> ServiceResult<String> {
        let body: FixDiacriticsResponse = self
            .post_json(
                format!("{}/fix-diacritics", self.base_url),
                &FixDiacriticsRequest { text },
            )
            .await?;

        match body.fixed_text {
            Some(fixed) => Ok(fixed.trim().to_string()),
            None => {
                warn!("AI service did not return fixed_text, keeping original");
                Ok(text.to_string())
            }
        }
    }
}

/// Recognizer used when `AI_SERVICE_URL` is not configured.
pub struct DisabledGestureRecognizer;

#[async_trait]
impl BaseGestureRecognizer for DisabledGestureRecognizer {
    async fn recognize(
        &self,
        _frames: &[serde_json::Value],
        _current_text: &str,
    ) -> ServiceResult<Recognition> {
        Err(ServiceError::ExternalServiceUnavailable(
            "AI service is not configured".to_string(),
        ))
    }

    async fn fix_diacritics(&self, _text: &str) -> ServiceResult<String> {
        Err(ServiceError::ExternalServiceUnavailable(
            "AI service is not configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: serde_json::Value) -> RecognizeResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_successful_reply_is_trimmed() {
        let recognition = into_recognition(response(serde_json::json!({
            "success": true,
            "predicted_word": " xin chào ",
            "confidence": 0.93,
            "raw_char": "o"
        })))
        .unwrap();

        assert_eq!(recognition.predicted_word, "xin chào");
        assert_eq!(recognition.raw_char.as_deref(), Some("o"));
    }

    #[test]
    fn test_error_field_is_external_failure() {
        let err = into_recognition(response(serde_json::json!({
            "success": true,
            "predicted_word": "a",
            "error": "model not loaded"
        })))
        .unwrap_err();

        assert!(matches!(err, ServiceError::ExternalService { status: 500, .. }));
    }

    #[test]
    fn test_blank_prediction_is_external_failure() {
        let err = into_recognition(response(serde_json::json!({
            "success": true,
            "predicted_word": "   "
        })))
        .unwrap_err();

        assert!(matches!(err, ServiceError::ExternalService { .. }));
    }

    #[tokio::test]
    async fn test_empty_frames_rejected_before_any_call() {
        let client =
            GestureServiceClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        let err = client.recognize(&[], "").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_disabled_recognizer_is_unavailable() {
        let err = DisabledGestureRecognizer
            .fix_diacritics("xin chao")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::ExternalServiceUnavailable(_)));
    }
}
