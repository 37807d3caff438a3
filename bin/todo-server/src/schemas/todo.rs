use crate::entities::TodoRecord;
use crate::error::ServerError;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Fixed page size for `GET /api/todos`.
pub const PAGE_SIZE: i64 = 10;

/// Body of `POST /api/todos` and `PUT /api/todos/{id}`.
///
/// Both fields are optional at the wire level so that a missing field is
/// reported as a validation failure rather than a generic parse error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct TodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Validated `title`/`description` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFields {
    pub title: String,
    pub description: String,
}

impl TodoRequest {
    /// Both fields must be present and contain something other than
    /// whitespace.
    pub fn into_fields(self) -> Result<TodoFields, ServerError> {
        Ok(TodoFields {
            title: required("title", self.title)?,
            description: required("description", self.description)?,
        })
    }
}

fn required(label: &str, value: Option<String>) -> Result<String, ServerError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(ServerError::Validation(format!("{label} must not be empty"))),
        None => Err(ServerError::Validation(format!("{label} is required"))),
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number, read from its leading digits; anything without
    /// a positive leading integer means 1.
    pub page: Option<String>,
}

impl PageQuery {
    /// Builds the query from raw pairs. A repeated `page` keeps its first value.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            page: pairs
                .iter()
                .find(|(key, _)| key == "page")
                .map(|(_, value)| value.clone()),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(leading_integer)
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    /// Number of documents to skip for this page.
    pub fn skip(&self) -> i64 {
        (self.page() - 1).saturating_mul(PAGE_SIZE)
    }
}

/// Integer formed by an optional sign and the leading digits after any
/// leading whitespace, so `"2abc"` is 2 and `"2.5"` is 2. Saturates on
/// overflow; `None` when there are no digits.
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, rest) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest[..digits]
        .bytes()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(i64::from(d - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodoResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TodoRecord {
    pub fn to_response(&self) -> TodoResponse {
        TodoResponse {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}
