//! Domain DTOs for the todo API.
//!
//! # Design
//! These types mirror the server's wire schema but are defined independently,
//! so the client never links against Axum or sqlx. Integration tests catch
//! any schema drift between the two crates. Field names are camelCase on the
//! wire and timestamps are UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    /// `None` while the item is open.
    pub completion_date: Option<DateTime<Utc>>,
}

/// Request payload for creating a new item. The server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodoItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

/// Body of a status toggle. The server only reads the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub id: i64,
}

/// Which items a list call should return. `incomplete` wins over `completed`
/// on the server when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub incomplete: bool,
    pub completed: bool,
}

impl ListFilter {
    pub fn incomplete() -> Self {
        Self {
            incomplete: true,
            completed: false,
        }
    }

    pub fn completed() -> Self {
        Self {
            incomplete: false,
            completed: true,
        }
    }

    /// Query string including the leading `?`, or empty when no flag is set.
    pub fn query_string(&self) -> String {
        let mut params = Vec::new();
        if self.incomplete {
            params.push("showIncomplete=true");
        }
        if self.completed {
            params.push("showCompleted=true");
        }
        if params.is_empty() {
            String::new()
        } else {
            format!("?{}", params.join("&"))
        }
    }
}

/// Error body returned by the server for every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
