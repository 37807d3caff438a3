use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Descriptions longer than this are shortened by [`Todo::preview`].
pub const PREVIEW_CHARS: usize = 40;

/// A todo as returned by the server. Disposable: re-fetched after every
/// mutation rather than patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Case-insensitive substring match on title or description.
    /// An empty term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }

    /// Description cut to `max_chars` characters, with `...` appended when
    /// something was cut.
    pub fn preview(&self, max_chars: usize) -> String {
        match self.description.char_indices().nth(max_chars) {
            Some((byte_idx, _)) => format!("{}...", &self.description[..byte_idx]),
            None => self.description.clone(),
        }
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoInput {
    pub title: String,
    pub description: String,
}

impl TodoInput {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// `{message, error?}` body used for confirmations and failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Todos from `todos` matching `term`, in their original order.
pub fn filter_todos<'a>(todos: &'a [Todo], term: &str) -> Vec<&'a Todo> {
    todos.iter().filter(|t| t.matches(term)).collect()
}
