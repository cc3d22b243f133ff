use crate::core::{FeedClient, FeedError};
use async_trait::async_trait;
use tracing::debug;

/// [`FeedClient`] backed by `reqwest`. Non-success statuses are reported as transport errors.
pub struct HttpFeedClient {
    client: reqwest::Client,
}

impl HttpFeedClient {
    pub fn new() -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cnbrates/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_body(&self, url: &str) -> Result<String, FeedError> {
        debug!("Requesting rate feed from {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        debug!(status = %response.status(), "Received feed response");
        Ok(response.text().await?)
    }
}
