//! Client-side view of the todo list: the last fetched page, the current
//! selection, the add-dialog flag and the search term.
//!
//! The server is the source of truth. Every successful mutation is followed
//! by a fresh fetch of page 1; nothing is patched locally.

use tracing::{info, warn};

use crate::client::TodoClient;
use crate::error::ClientError;
use crate::model::{Todo, TodoInput, filter_todos};

#[derive(Debug)]
pub struct TodoSession {
    client: TodoClient,
    todos: Vec<Todo>,
    selected: Option<Todo>,
    modal_open: bool,
    search_term: String,
}

impl TodoSession {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            todos: Vec::new(),
            selected: None,
            modal_open: false,
            search_term: String::new(),
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    /// The last successfully fetched page.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn selected(&self) -> Option<&Todo> {
        self.selected.as_ref()
    }

    /// Selects the todo with `id` from the local view. An id that is not on
    /// the current page clears the selection.
    pub fn select(&mut self, id: &str) -> Option<&Todo> {
        self.selected = self.todos.iter().find(|t| t.id == id).cloned();
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn open_modal(&mut self) {
        self.modal_open = true;
    }

    pub fn close_modal(&mut self) {
        self.modal_open = false;
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// The local page filtered by the search term. Never hits the network.
    pub fn visible(&self) -> Vec<&Todo> {
        filter_todos(&self.todos, &self.search_term)
    }

    /// Replaces the local view with `page`. On failure the previous view is
    /// kept and the error is logged and returned.
    pub async fn refresh(&mut self, page: u32) -> Result<(), ClientError> {
        match self.client.list(page).await {
            Ok(todos) => {
                self.todos = todos;
                Ok(())
            }
            Err(e) => {
                warn!(page, error = %e, "failed to fetch todos");
                Err(e)
            }
        }
    }

    pub async fn add(&mut self, title: &str, description: &str) -> Result<Todo, ClientError> {
        let created = self
            .client
            .create(&TodoInput::new(title, description))
            .await
            .inspect_err(|e| warn!(error = %e, "failed to add todo"))?;
        info!(id = %created.id, "todo added");
        self.resync().await;
        Ok(created)
    }

    /// Sends both fields; the current selection keeps its old contents until
    /// it is selected again from the refreshed view.
    pub async fn apply(&mut self, id: &str, title: &str, description: &str) -> Result<Todo, ClientError> {
        let updated = self
            .client
            .update(id, &TodoInput::new(title, description))
            .await
            .inspect_err(|e| warn!(%id, error = %e, "failed to update todo"))?;
        info!(%id, "todo updated");
        self.resync().await;
        Ok(updated)
    }

    pub async fn remove(&mut self, id: &str) -> Result<(), ClientError> {
        self.client
            .delete(id)
            .await
            .inspect_err(|e| warn!(%id, error = %e, "failed to delete todo"))?;
        info!(%id, "todo deleted");
        self.resync().await;
        self.selected = None;
        Ok(())
    }

    /// Submits the add dialog. Returns `Ok(false)` and leaves the dialog open
    /// when either field is empty; otherwise adds the todo and closes it.
    pub async fn submit_modal(&mut self, title: &str, description: &str) -> Result<bool, ClientError> {
        if title.is_empty() || description.is_empty() {
            return Ok(false);
        }
        self.close_modal();
        self.add(title, description).await?;
        Ok(true)
    }

    /// Re-fetches page 1 after a mutation. The mutation already succeeded, so
    /// a failure here is logged and the stale view is kept.
    async fn resync(&mut self) {
        if self.refresh(1).await.is_err() {
            warn!("view is stale until the next refresh");
        }
    }
}
