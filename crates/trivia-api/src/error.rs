//! API error types and JSON error response formatting.
//!
//! Every failure collapses into one of a handful of kinds. The response body
//! carries only the numeric code and a fixed message for that kind; the
//! detail string is logged and never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use trivia_core::error::TriviaError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always false.
    pub success: bool,
    /// HTTP status code.
    pub error: u16,
    /// Fixed human-readable message for the code.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request.
    BadRequest(String),
    /// 404 Not Found - missing entity or empty page.
    NotFound(String),
    /// 405 Method Not Allowed - raised by the router only.
    MethodNotAllowed,
    /// 422 Unprocessable Entity - the request was understood but the
    /// operation could not be completed.
    Unprocessable(String),
    /// 500 Internal Server Error.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message clients see for this kind.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad request",
            ApiError::NotFound(_) => "resource not found",
            ApiError::MethodNotAllowed => "method not allowed",
            ApiError::Unprocessable(_) => "unprocessable",
            ApiError::Internal(_) => "internal server error",
        }
    }

    fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::NotFound(msg)
            | ApiError::Unprocessable(msg)
            | ApiError::Internal(msg) => msg,
            ApiError::MethodNotAllowed => "",
        }
    }

    pub fn bad_request(err: impl std::fmt::Display) -> Self {
        ApiError::BadRequest(err.to_string())
    }

    pub fn not_found(err: impl std::fmt::Display) -> Self {
        ApiError::NotFound(err.to_string())
    }

    pub fn unprocessable(err: impl std::fmt::Display) -> Self {
        ApiError::Unprocessable(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), detail = %self.detail(), "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), detail = %self.detail(), "Request rejected");
        }

        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.public_message().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<TriviaError> for ApiError {
    fn from(err: TriviaError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
