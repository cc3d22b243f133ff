//! Abstraction over fetching a raw rate feed

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The feed could not be produced by a client that does not speak HTTP,
    /// such as a file or an in-process source.
    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Issues a GET to `url` and returns the response body as text.
    async fn fetch_body(&self, url: &str) -> Result<String, FeedError>;
}
