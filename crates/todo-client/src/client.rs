//! Thin HTTP wrapper over the todo API: one method per operation, no retries.

use std::time::Duration;

use reqwest::{Client, Response, Url};
use tracing::debug;

use crate::error::ClientError;
use crate::model::{Message, Todo, TodoInput};

/// Default server address, matching the server's default bind port.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct TodoClient {
    base: Url,
    client: Client,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Client for the URL in `TODO_API_URL`, or [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self, ClientError> {
        let url = std::env::var("TODO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        Self::new(&url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url).map_err(|e| ClientError::Url(format!("{base_url}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::Url(format!("{base_url}: scheme must be http or https")));
        }
        base.path_segments_mut()
            .map_err(|_| ClientError::Url(format!("{base_url}: cannot be a base")))?
            .pop_if_empty();

        let client = Client::builder()
            .user_agent(concat!("todo-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `true` when `GET /health` answers with a success status.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let resp = self.client.get(self.endpoint(&["health"])?).send().await?;
        Ok(resp.status().is_success())
    }

    /// `GET /api/todos?page=N`.
    pub async fn list(&self, page: u32) -> Result<Vec<Todo>, ClientError> {
        let mut url = self.endpoint(&["api", "todos"])?;
        url.set_query(Some(&format!("page={page}")));
        let resp = self.client.get(url).send().await?;
        Ok(expect_success(resp).await?.json().await?)
    }

    /// `POST /api/todos`.
    pub async fn create(&self, input: &TodoInput) -> Result<Todo, ClientError> {
        let resp = self
            .client
            .post(self.endpoint(&["api", "todos"])?)
            .json(input)
            .send()
            .await?;
        Ok(expect_success(resp).await?.json().await?)
    }

    /// `PUT /api/todos/{id}`; both fields are always sent.
    pub async fn update(&self, id: &str, input: &TodoInput) -> Result<Todo, ClientError> {
        let resp = self
            .client
            .put(self.endpoint(&["api", "todos", id])?)
            .json(input)
            .send()
            .await?;
        Ok(expect_success(resp).await?.json().await?)
    }

    /// `DELETE /api/todos/{id}`; returns the server's confirmation message.
    pub async fn delete(&self, id: &str) -> Result<String, ClientError> {
        let resp = self
            .client
            .delete(self.endpoint(&["api", "todos", id])?)
            .send()
            .await?;
        let body: Message = expect_success(resp).await?.json().await?;
        Ok(body.message)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Url(self.base.to_string()))?
            .extend(segments);
        Ok(url)
    }
}

/// Turns any non-2xx response into [`ClientError::Status`], keeping the
/// server's `message` when the body carries one.
async fn expect_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let fallback = status.canonical_reason().unwrap_or("unknown status").to_owned();
    let message = match resp.json::<Message>().await {
        Ok(Message { message, error: Some(detail) }) => format!("{message}: {detail}"),
        Ok(Message { message, error: None }) => message,
        Err(e) => {
            debug!(error = %e, "error response had no message body");
            fallback
        }
    };
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
