//! Shared API response types and error handling.
//!
//! Every endpoint answers with the same envelope: `{success, data, error}`.

use crate::{core::forms::field_errors, errors::Error};
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::error;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Payload on success, or details of a validation failure
    pub data: Option<T>,
    /// Human-readable error message
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response carrying `data`.
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Wraps the envelope in a response with the given status code.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, ResponseJson(self)).into_response()
    }
}

impl ApiResponse<()> {
    /// Failed response with only a message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Per-field validation messages, keyed by dotted field path.
#[derive(Debug, Serialize)]
pub struct FieldErrors {
    /// e.g. `client.phone_number → ["..."]`
    pub fields: BTreeMap<String, Vec<String>>,
}

/// Message returned alongside per-field validation errors.
pub const VALIDATION_MESSAGE: &str = "Please correct the errors below.";

/// Convert service errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Self::Validation(errors) = &self {
            return ApiResponse {
                success: false,
                data: Some(FieldErrors {
                    fields: field_errors(errors),
                }),
                error: Some(VALIDATION_MESSAGE.to_string()),
            }
            .with_status(StatusCode::UNPROCESSABLE_ENTITY);
        }

        let (status, message) = match &self {
            err if err.is_not_found() => (StatusCode::NOT_FOUND, self.to_string()),
            Self::InvalidStatus { .. }
            | Self::InvalidQuoteType { .. }
            | Self::InvalidFilter { .. } => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::SubmissionFailed { .. } => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            _ => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        ApiResponse::<()>::error(message).with_status(status)
    }
}

/// Malformed JSON bodies keep axum's status code but use the standard envelope.
pub fn json_rejection(rejection: &JsonRejection) -> Response {
    ApiResponse::<()>::error(rejection.body_text()).with_status(rejection.status())
}

/// Unparseable path parameters keep axum's status code but use the standard envelope.
pub fn path_rejection(rejection: &PathRejection) -> Response {
    ApiResponse::<()>::error(rejection.body_text()).with_status(rejection.status())
}
