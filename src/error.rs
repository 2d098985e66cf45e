//! Error types for the survey intake service.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for survey intake operations.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// Missing or malformed client input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Bad credentials or an invalid/expired token.
    #[error("Unauthorized: {0}")]
    Auth(String),

    /// Request body refused before it could be parsed (size, content type).
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<JsonRejection> for SurveyError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                SurveyError::Validation(rejection.body_text())
            }
            other => SurveyError::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl From<FormRejection> for SurveyError {
    fn from(rejection: FormRejection) -> Self {
        match rejection {
            FormRejection::FailedToDeserializeForm(_)
            | FormRejection::FailedToDeserializeFormBody(_) => {
                SurveyError::Validation(rejection.body_text())
            }
            other => SurveyError::Rejected {
                status: other.status(),
                message: other.body_text(),
            },
        }
    }
}

impl IntoResponse for SurveyError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            SurveyError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                "Invalid request payload".to_string(),
                Some(msg.clone()),
            ),
            SurveyError::Auth(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None),
            SurveyError::Rejected { status, message } => {
                let code = match *status {
                    StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
                    StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
                    _ => "BAD_REQUEST",
                };
                (*status, code, message.clone(), None)
            }
            SurveyError::StorageUnavailable(e) => {
                // Log the actual error but don't expose internals
                tracing::error!(error = %e, "Storage error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "STORAGE_UNAVAILABLE",
                    "The survey store is unavailable".to_string(),
                    None,
                )
            }
            SurveyError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                "Configuration error".to_string(),
                Some(msg.clone()),
            ),
            SurveyError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Result type alias for survey intake operations.
pub type SurveyResult<T> = Result<T, SurveyError>;
