//! Persistence abstraction for imported currency rates

use crate::core::currency::{RateTable, StoredRate};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] fjall::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid rate {rate} for {base}/{target}")]
    InvalidRate {
        base: String,
        target: String,
        rate: f64,
    },
    #[error("{0}")]
    Rejected(String),
}

#[async_trait]
pub trait CurrencyRateStore: Send + Sync {
    /// Writes every rate in `rates`, replacing existing pairs. Either all rates are written or none.
    async fn save_rates(&self, rates: &RateTable) -> Result<(), StoreError>;

    async fn load_rates(&self) -> Result<Vec<StoredRate>, StoreError>;
}

/// Rejects the table if any rate is not a finite positive number.
pub fn validate_rates(rates: &RateTable) -> Result<(), StoreError> {
    for (base, targets) in rates {
        for (target, rate) in targets {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(StoreError::InvalidRate {
                    base: base.clone(),
                    target: target.clone(),
                    rate: *rate,
                });
            }
        }
    }
    Ok(())
}

/// Key under which a currency pair is stored.
pub fn pair_key(base: &str, target: &str) -> String {
    format!("{base}/{target}")
}
