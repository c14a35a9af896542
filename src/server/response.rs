use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::Error;

/// API error that converts to the JSON error envelope `{success, pesan}`.
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "pesan": self.message });
        (self.status, Json(body)).into_response()
    }
}

/// Maps library errors onto HTTP statuses. Storage and IO details are
/// logged and replaced with a generic message rather than leaked.
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(message) => ApiError::bad_request(message),
            Error::CategoryNotFound(_) | Error::NotFound => ApiError::not_found(err.to_string()),
            Error::EmailTaken => ApiError::conflict(err.to_string()),
            Error::Unauthorized | Error::InvalidTokenFormat | Error::TokenExpired => {
                ApiError::unauthorized(err.to_string())
            }
            Error::Database(_) | Error::Io(_) | Error::Config(_) => {
                tracing::error!("request failed: {err}");
                ApiError::internal("internal server error")
            }
        }
    }
}
