use thiserror::Error;

/// Errors returned by [`crate::TodoClient`] and [`crate::TodoSession`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The configured base URL cannot be used.
    #[error("invalid base URL: {0}")]
    Url(String),
}
