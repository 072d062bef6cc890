use axum::Json;
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use gatehouse_core::{AppError, BackendError, FieldErrors};
use serde::Serialize;
use tracing::{error, warn};

/// API error payload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

fn backend_status(error: &BackendError) -> StatusCode {
    match error {
        BackendError::EmailInUse => StatusCode::CONFLICT,
        BackendError::WeakPassword => StatusCode::BAD_REQUEST,
        BackendError::InvalidCredentials
        | BackendError::AccountNotFound
        | BackendError::RequiresRecentLogin => StatusCode::UNAUTHORIZED,
        BackendError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        BackendError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut retry_after = None;
        let (status, message, errors) = match self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message, None),
            AppError::InvalidInput(errors) => (
                StatusCode::BAD_REQUEST,
                "please correct the highlighted fields".to_owned(),
                Some(errors),
            ),
            AppError::RateLimited {
                retry_after_seconds,
                message,
            } => {
                retry_after = Some(retry_after_seconds);
                (StatusCode::TOO_MANY_REQUESTS, message, None)
            }
            AppError::Backend(backend) => {
                if let BackendError::Unknown(code) = &backend {
                    warn!(code = code.as_str(), "identity backend returned an unknown error");
                }
                (backend_status(&backend), backend.to_string(), None)
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message, None),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            AppError::Internal(message) => {
                error!(error = message.as_str(), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                    None,
                )
            }
        };

        let mut response = (status, Json(ErrorResponse { message, errors })).into_response();
        if let Some(seconds) = retry_after {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(seconds));
        }

        response
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
