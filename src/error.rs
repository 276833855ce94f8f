//! # API Errors
//!
//! Request-level error taxonomy and its translation to HTTP. Handlers and
//! services return [`ApiError`]; this module is the only place that picks
//! status codes and renders the `{ "errors": ... }` envelope.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::database::store::StoreError;
use crate::state_structs::WebResponse;

/// Convenient result alias for handlers and services.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Username or password wrong")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    /// Absent and not-owned are deliberately the same thing.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) | Self::Storage(StoreError::Duplicate(_)) => StatusCode::CONFLICT,
            Self::Storage(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(StoreError::Query(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the caller. Infrastructure details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::Storage(StoreError::Unavailable(_)) => {
                "Service temporarily unavailable, please retry".to_string()
            }
            Self::Storage(StoreError::Duplicate(_)) => "Resource already exists".to_string(),
            Self::Storage(StoreError::Query(_)) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = WebResponse::<()>::error(self.public_message());
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(StoreError::Unavailable("pool timeout".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_infrastructure_details_are_redacted() {
        let err = ApiError::from(StoreError::Query("relation \"users\" does not exist".into()));
        assert_eq!(err.public_message(), "Internal server error");

        let err = ApiError::not_found("Contact not found");
        assert_eq!(err.public_message(), "Contact not found");
    }
}
