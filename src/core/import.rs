//! Rate import contract

use crate::core::currency::RateTable;
use crate::core::message::MessageLog;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Currency Rates URL is not configured.")]
    UrlNotConfigured,
}

#[async_trait]
pub trait RateImporter: Send + Sync {
    /// Fetches, parses and saves rates. Failures are recorded in [`RateImporter::messages`].
    async fn import_rates(&mut self);

    /// Fetches and parses rates without saving them. Returns an empty table on failure.
    async fn fetch_rates(&mut self) -> RateTable;

    /// Messages recorded by the most recent call.
    fn messages(&self) -> &MessageLog;
}
