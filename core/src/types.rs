//! Wire DTOs for the todo API.
//!
//! # Design
//! These mirror the server's records but are defined independently so the
//! client does not link against axum. The end-to-end test catches schema
//! drift between the two crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub value: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for adding a todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTodo {
    pub value: String,
}

/// Body of a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTodo {
    pub message: String,
    pub deleted_todo: Todo,
}

/// Error body the server attaches to 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
