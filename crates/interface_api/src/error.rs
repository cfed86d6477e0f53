//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::CoreError;
use domain_quote::QuoteError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Upstream failure: {0}")]
    BadGateway(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<Vec<String>>,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg, None),
            ApiError::Validation { message, details } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                message,
                details,
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        let message = err.to_string();
        match err {
            err if err.is_validation() => ApiError::validation(message),
            QuoteError::ProductNotFound(_)
            | QuoteError::SessionNotFound(_)
            | QuoteError::QuoteNotFound(_)
            | QuoteError::EntityNotFound(_) => ApiError::NotFound(message),
            QuoteError::NoFormAvailable(_)
            | QuoteError::InvalidStateTransition { .. }
            | QuoteError::SubmissionInFlight
            | QuoteError::SubmissionDiscarded => ApiError::Conflict(message),
            QuoteError::SubmissionTransportFailure(_) | QuoteError::LedgerUnavailable(_) => {
                ApiError::BadGateway(message)
            }
            _ => ApiError::Internal(message),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        if err.is_input_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: {}", error.code),
                })
            })
            .collect();

        ApiError::Validation {
            message: "The request body is invalid".to_string(),
            details: Some(details),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: QuoteError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_quote_errors_map_to_status_codes() {
        assert_eq!(status_of(QuoteError::missing("email")), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_of(QuoteError::TermsNotAccepted), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_of(QuoteError::ProductNotFound("Pet Insurance".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(QuoteError::NoFormAvailable("Domestic Package".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(QuoteError::SubmissionInFlight), StatusCode::CONFLICT);
        assert_eq!(
            status_of(QuoteError::SubmissionTransportFailure("timeout".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(QuoteError::Export("bad row".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_malformed_ids_are_bad_requests() {
        let err = "SES-not-a-uuid".parse::<core_kernel::SessionId>().unwrap_err();
        assert_eq!(ApiError::from(err).into_response().status(), StatusCode::BAD_REQUEST);

        let config = CoreError::configuration("quote_validity_days must be at least 1");
        assert_eq!(
            ApiError::from(config).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
