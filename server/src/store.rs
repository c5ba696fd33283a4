//! In-memory record store for todos.
//!
//! # Design
//! `TodoStore` exclusively owns the ordered record list and the id counter.
//! It is a plain struct with `&mut self` mutators so tests can build a fresh
//! store per case. Handlers share one instance through `SharedStore`, whose
//! write lock serializes id allocation and appends.

use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::TodoError;

/// Store handle passed to request handlers as axum state.
pub type SharedStore = Arc<RwLock<TodoStore>>;

/// A single todo item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub id: u64,
    pub value: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct TodoStore {
    records: Vec<TodoRecord>,
    next_id: u64,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Wrap a fresh store in the handle type used by the router.
    pub fn shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// All current records in insertion order.
    pub fn list(&self) -> &[TodoRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a new record. `None`, empty, and whitespace-only values are
    /// rejected without touching the id counter.
    pub fn create(&mut self, value: Option<&str>) -> Result<TodoRecord, TodoError> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return Err(TodoError::empty_value());
        }

        let id = self.next_id;
        let next_id = id
            .checked_add(1)
            .ok_or_else(|| TodoError::Internal("todo id counter exhausted".to_string()))?;

        let now = now();
        let record = TodoRecord {
            id,
            value: value.to_string(),
            is_completed: false,
            created_at: now,
            updated_at: now,
        };
        self.records.push(record.clone());
        self.next_id = next_id;

        tracing::debug!(id, "created todo");
        Ok(record)
    }

    /// Flip `is_completed` in place and refresh `updated_at`.
    pub fn toggle_complete(&mut self, id: u64) -> Result<TodoRecord, TodoError> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| TodoError::not_found(id))?;

        record.is_completed = !record.is_completed;
        record.updated_at = later_than(record.updated_at);

        tracing::debug!(id, is_completed = record.is_completed, "toggled todo");
        Ok(record.clone())
    }

    /// Remove the record and return it as it was just before removal.
    pub fn delete(&mut self, id: u64) -> Result<TodoRecord, TodoError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| TodoError::not_found(id))?;

        let removed = self.records.remove(index);
        tracing::debug!(id, "deleted todo");
        Ok(removed)
    }
}

// Millisecond precision matches what clients see after a JSON round-trip.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Current time, bumped past `previous` when the clock has not moved on.
fn later_than(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}
