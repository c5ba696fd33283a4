//! Error taxonomy for todo operations.
//!
//! # Design
//! Store operations return `TodoError`; the HTTP boundary turns each kind into
//! a status code with an exhaustive `match`. `Internal` carries a detail string
//! for the log only. Callers always see the generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to the caller for any `Internal` failure.
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// Errors produced by `TodoStore` operations and the request handlers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Caller-supplied input failed a precondition. The store is unchanged.
    #[error("{0}")]
    Validation(String),

    /// No record has the requested id. `id` is the raw path segment, so a
    /// non-numeric id lands here as well.
    #[error("todo {id} not found")]
    NotFound { id: String },

    /// Anything unexpected. The detail is logged, never sent.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TodoError {
    pub fn empty_value() -> Self {
        TodoError::Validation("todo value must not be empty".to_string())
    }

    /// The add body could not be read at all, e.g. it exceeded the size limit.
    pub fn unreadable_body() -> Self {
        TodoError::Validation("todo request body could not be read".to_string())
    }

    pub fn not_found(id: impl ToString) -> Self {
        TodoError::NotFound { id: id.to_string() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TodoError::Validation(_) => StatusCode::BAD_REQUEST,
            TodoError::NotFound { .. } => StatusCode::NOT_FOUND,
            TodoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the response body.
    pub fn public_message(&self) -> String {
        match self {
            TodoError::Internal(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            TodoError::Internal(detail) => tracing::error!(%detail, "request failed"),
            other => tracing::debug!(status = status.as_u16(), error = %other, "request rejected"),
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_maps_to_its_status() {
        assert_eq!(TodoError::empty_value().status(), StatusCode::BAD_REQUEST);
        assert_eq!(TodoError::not_found(7).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            TodoError::Internal("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_public() {
        let err = TodoError::Internal("id counter exhausted".to_string());
        assert_eq!(err.public_message(), INTERNAL_MESSAGE);
        assert!(err.to_string().contains("id counter exhausted"));
    }

    #[test]
    fn not_found_keeps_raw_segment() {
        let err = TodoError::not_found("abc");
        assert_eq!(err.public_message(), "todo abc not found");
    }
}
