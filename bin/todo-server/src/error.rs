//! Unified server error type.
//!
//! Handlers produce [`ServerError`] and tag it with the [`TodoOp`] that
//! failed. The resulting [`TodoError`] implements
//! [`axum::response::IntoResponse`]; the operation decides the message text
//! and which status a store failure maps to.
//!
//! **Security note:** store errors are logged with full detail but only a
//! generic message is returned to the caller so that SQL or file paths never
//! leak to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur while serving a todo request.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A required field is missing or blank.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The id or request body could not be parsed.
    #[error("malformed request: {0}")]
    Malformed(String),

    /// The caller referenced a todo that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Propagated from the store (connectivity, timeout, constraint).
    #[error("store unavailable: {0}")]
    Store(#[from] sqlx::Error),
}

/// The four todo operations, as far as failure reporting is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoOp {
    Create,
    List,
    Update,
    Delete,
}

impl TodoOp {
    pub fn failure_message(self) -> &'static str {
        match self {
            TodoOp::Create => "Error creating todo",
            TodoOp::List => "Error fetching todos",
            TodoOp::Update => "Error updating todo",
            TodoOp::Delete => "Error deleting todo",
        }
    }

    /// Status for a store failure. Create and update report every failure
    /// as a bad request; list and delete report store failures as 500.
    fn store_failure_status(self) -> StatusCode {
        match self {
            TodoOp::Create | TodoOp::Update => StatusCode::BAD_REQUEST,
            TodoOp::List | TodoOp::Delete => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A [`ServerError`] together with the operation it interrupted.
#[derive(Debug, Error)]
#[error("{}: {source}", .op.failure_message())]
pub struct TodoError {
    pub op: TodoOp,
    #[source]
    pub source: ServerError,
}

impl ServerError {
    pub fn during(self, op: TodoOp) -> TodoError {
        TodoError { op, source: self }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let message = self.op.failure_message();
        match self.source {
            ServerError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Todo not found" })),
            )
                .into_response(),
            ServerError::Validation(detail) | ServerError::Malformed(detail) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": message, "error": detail })),
            )
                .into_response(),
            ServerError::Store(e) => {
                error!(error = %e, op = ?self.op, "store error");
                let status = self.op.store_failure_status();
                let body = if status == StatusCode::BAD_REQUEST {
                    json!({ "message": message, "error": "store unavailable" })
                } else {
                    json!({ "message": message })
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Tag any error convertible into [`ServerError`] with the operation it
/// interrupted.
pub trait ResultExt<T> {
    fn during(self, op: TodoOp) -> Result<T, TodoError>;
}

impl<T, E: Into<ServerError>> ResultExt<T> for Result<T, E> {
    fn during(self, op: TodoOp) -> Result<T, TodoError> {
        self.map_err(|e| e.into().during(op))
    }
}
