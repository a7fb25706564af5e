//! Wire and storage types for to-do items.
//!
//! # Design
//! `TodoItem` is both the JSON body and the row type: field names are
//! camelCase on the wire and snake_case in the `todo_items` table. Incoming
//! timestamps pass through [`parse_utc`] so every stored date is UTC, whatever
//! offset (or lack of one) the client sent.

use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::validation::parse_utc;

/// A single to-do item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Assigned by storage on insert. A missing id deserializes as `0`.
    #[serde(default)]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_utc")]
    pub due_date: DateTime<Utc>,
    /// `None` while the item is open.
    #[serde(default, deserialize_with = "deserialize_opt_utc")]
    pub completion_date: Option<DateTime<Utc>>,
}

impl TodoItem {
    pub fn is_completed(&self) -> bool {
        self.completion_date.is_some()
    }
}

/// Request payload for creating an item. Any `id` in the body is ignored.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTodoItem {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_utc")]
    pub due_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_opt_utc")]
    pub completion_date: Option<DateTime<Utc>>,
}

/// Request payload for the status toggle. Only the id is read; the rest of
/// an item body may be sent and is ignored.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub id: i64,
}

/// Query flags accepted by `GET /items`.
#[derive(Clone, Copy, Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Return only items without a completion date.
    #[serde(default)]
    pub show_incomplete: bool,
    /// Return only completed items. Ignored when `showIncomplete` is set.
    #[serde(default)]
    pub show_completed: bool,
}

impl ListQuery {
    pub fn filter(&self) -> ItemFilter {
        ItemFilter::from_flags(self.show_incomplete, self.show_completed)
    }
}

/// Which slice of the item table a listing returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemFilter {
    All,
    Incomplete,
    Completed,
}

impl ItemFilter {
    /// Collapse the two query flags into one filter. `show_incomplete` wins
    /// when both are set.
    pub fn from_flags(show_incomplete: bool, show_completed: bool) -> Self {
        if show_incomplete {
            ItemFilter::Incomplete
        } else if show_completed {
            ItemFilter::Completed
        } else {
            ItemFilter::All
        }
    }

    pub fn matches(&self, item: &TodoItem) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::Incomplete => !item.is_completed(),
            ItemFilter::Completed => item.is_completed(),
        }
    }
}

fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc(&raw).map_err(D::Error::custom)
}

fn deserialize_opt_utc<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| parse_utc(&raw).map_err(D::Error::custom))
        .transpose()
}
