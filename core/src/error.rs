//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `BadRequest` get dedicated variants because they are the
//! two failures the server reports on purpose. Every other non-success
//! response lands in `HttpError` with the raw status code and body.

use thiserror::Error;

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: no todo has that id.
    #[error("resource not found")]
    NotFound,

    /// The server returned 400, with its `error` message when it sent one.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The server returned an unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
