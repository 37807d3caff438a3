//! HTTP client for todo-server plus the client-side session state that sits
//! behind a list/detail UI.
//!
//! ```no_run
//! # async fn demo() -> Result<(), todo_client::ClientError> {
//! use todo_client::{TodoClient, TodoSession};
//!
//! let mut session = TodoSession::new(TodoClient::from_env()?);
//! session.refresh(1).await?;
//! session.add("Buy milk", "2%").await?;
//! for todo in session.visible() {
//!     println!("{}: {}", todo.title, todo.preview(todo_client::PREVIEW_CHARS));
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod model;
mod session;

#[cfg(test)]
mod stub;

pub use client::{DEFAULT_API_URL, TodoClient};
pub use error::ClientError;
pub use model::{Message, PREVIEW_CHARS, Todo, TodoInput, filter_todos};
pub use session::TodoSession;
