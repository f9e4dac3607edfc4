//! JSON envelope and error mapping shared by all routes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::common::ServiceError;

/// `{ "success": bool, "message": string, "data": T? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

/// Route-level error. Wraps `ServiceError` and adds the auth failures only the
/// HTTP layer can produce.
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    Unauthorized,
    Forbidden,
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Authentication required".into()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Admin access required".into()),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Service(err) => {
                let status = match err {
                    ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                    ServiceError::DuplicateWord(_) | ServiceError::InvalidState(_) => {
                        StatusCode::CONFLICT
                    }
                    ServiceError::InvalidPayload(_) | ServiceError::Validation(_) => {
                        StatusCode::BAD_REQUEST
                    }
                    ServiceError::ExternalServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    ServiceError::ExternalService { .. } => StatusCode::BAD_GATEWAY,
                    ServiceError::Database(_) | ServiceError::Internal(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };

                // Internal details stay in the logs
                let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
                    error!(error = %err, "Request failed");
                    "Internal server error".to_string()
                } else {
                    err.to_string()
                };
                (status, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = ApiResponse::<()> {
            success: false,
            message,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}
