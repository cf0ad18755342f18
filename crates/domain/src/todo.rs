//! Todo resource types.
//!
//! The server owns every Todo item; the suite only ever holds the payloads it
//! sends and the representations it reads back.

use serde::{Deserialize, Serialize};
use url::Url;

/// A Todo item as returned by `GET /todos/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Server-assigned identifier.
    #[serde(default)]
    pub id: Option<u64>,
    /// Item title.
    pub title: String,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
}

/// Payload for `POST /todos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    /// Title of the item to create.
    pub title: String,
}

impl NewTodo {
    /// Creates a payload with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

/// Payload for `PUT` and `PATCH /todos/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    /// New completion flag.
    pub completed: bool,
}

impl TodoPatch {
    /// Payload marking an item as completed.
    #[must_use]
    pub const fn completed() -> Self {
        Self { completed: true }
    }
}

/// Extracts the numeric id from a Todo location such as
/// `http://localhost:8000/todos/42`.
///
/// Returns `None` unless the last path segment is a positive integer and the
/// one before it is `todos`.
#[must_use]
pub fn todo_id_from_location(location: &str) -> Option<u64> {
    let url = Url::parse(location).ok()?;
    let mut segments = url.path_segments()?.rev().filter(|s| !s.is_empty());
    let id = segments.next()?.parse::<u64>().ok().filter(|id| *id > 0)?;
    (segments.next()? == "todos").then_some(id)
}
