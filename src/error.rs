//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Data-shaping failures (malformed numbers, malformed descriptions) never
//! become a `GatewayError`; they are absorbed by the view model assembler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "fundraising not found: 0xabc",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                   |
/// |-----------|-----------------|-------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request               |
/// | 2000–2999 | Not Found       | 404 Not Found                 |
/// | 3000–3999 | Server/Upstream | 500 Internal / 502 Bad Gateway |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A path or query parameter is not a well-formed hex address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Neither a live record nor a fallback listing exists for the id.
    #[error("fundraising not found: {0}")]
    FundraisingNotFound(String),

    /// The indexer has no proposal with the given id.
    #[error("proposal not found: {0}")]
    ProposalNotFound(String),

    /// The indexer could not be reached or answered with a non-success
    /// HTTP status.
    #[error("indexer unavailable: {0}")]
    IndexerUnavailable(String),

    /// The indexer answered, but with GraphQL errors or without data.
    #[error("indexer returned an invalid response: {0}")]
    IndexerResponse(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidAddress(_) => 1002,
            Self::FundraisingNotFound(_) => 2001,
            Self::ProposalNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::IndexerUnavailable(_) => 3001,
            Self::IndexerResponse(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            Self::FundraisingNotFound(_) | Self::ProposalNotFound(_) => StatusCode::NOT_FOUND,
            Self::IndexerUnavailable(_) | Self::IndexerResponse(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for the "not found" family, which clients render as a
    /// distinct state rather than as an error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FundraisingNotFound(_) | Self::ProposalNotFound(_)
        )
    }

    /// Builds the structured response body for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), error = %self, "request failed");
        } else if self.is_not_found() {
            tracing::debug!(code = self.error_code(), error = %self, "entity not found");
        }
        let mut response = axum::Json(self.to_body()).into_response();
        *response.status_mut() = status;
        response
    }
}
