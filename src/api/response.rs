//! Response types for the Roster Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::Conflict;
use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an error for a request without caller identity headers.
    pub fn unauthenticated(header: &str) -> Self {
        Self::with_details(
            "UNAUTHENTICATED",
            format!("missing header: {}", header),
            "Requests must carry X-Employee-Id and X-Role headers",
        )
    }
}

/// Body returned when a creation is refused because of conflicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResponse {
    /// Always `CONFLICT_DETECTED`.
    pub code: String,
    /// Human-readable summary.
    pub message: String,
    /// Everything the proposed shifts collide with.
    pub conflicts: Vec<Conflict>,
}

impl ConflictResponse {
    /// Wraps detected conflicts.
    pub fn new(conflicts: Vec<Conflict>) -> Self {
        Self {
            code: "CONFLICT_DETECTED".to_string(),
            message: format!(
                "{} conflict(s) detected; resend with confirm_conflicts to proceed",
                conflicts.len()
            ),
            conflicts,
        }
    }
}

impl IntoResponse for ConflictResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::CONFLICT,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self),
        )
            .into_response()
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                )
            }
            EngineError::Validation { field, .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details("VALIDATION_ERROR", message, format!("field: {}", field)),
            ),
            EngineError::InvalidRange { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_RANGE", message),
            ),
            EngineError::Forbidden { .. } => ApiErrorResponse::new(
                StatusCode::FORBIDDEN,
                ApiError::new("FORBIDDEN", message),
            ),
            EngineError::NotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("NOT_FOUND", message),
            ),
            EngineError::InvalidState { state, .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::with_details("INVALID_STATE", message, format!("current state: {}", state)),
            ),
            EngineError::InsufficientBalance { available, .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "INSUFFICIENT_BALANCE",
                    message,
                    format!("{} hours available", available),
                ),
            ),
        }
    }
}
