use crate::core::currency::{RateTable, StoredRate};
use crate::core::store::{CurrencyRateStore, StoreError, pair_key, validate_rates};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory rate store. Counts save calls and can be set up to reject every save.
#[derive(Default)]
pub struct MemoryRateStore {
    rates: Mutex<HashMap<String, StoredRate>>,
    last_saved: Mutex<Option<RateTable>>,
    save_calls: AtomicUsize,
    reject_with: Option<String>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saves always fail with `reason`.
    pub fn rejecting(reason: &str) -> Self {
        Self {
            reject_with: Some(reason.to_string()),
            ..Self::default()
        }
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// The table passed to the most recent successful save.
    pub async fn last_saved(&self) -> Option<RateTable> {
        self.last_saved.lock().await.clone()
    }
}

#[async_trait]
impl CurrencyRateStore for MemoryRateStore {
    async fn save_rates(&self, rates: &RateTable) -> Result<(), StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = &self.reject_with {
            return Err(StoreError::Rejected(reason.clone()));
        }
        validate_rates(rates)?;

        let now = Utc::now();
        let mut stored = self.rates.lock().await;
        for (base, targets) in rates {
            for (target, rate) in targets {
                debug!("Memory store PUT for pair: {}/{}", base, target);
                stored.insert(
                    pair_key(base, target),
                    StoredRate {
                        base: base.clone(),
                        target: target.clone(),
                        rate: *rate,
                        updated_at: now,
                    },
                );
            }
        }
        *self.last_saved.lock().await = Some(rates.clone());
        Ok(())
    }

    async fn load_rates(&self) -> Result<Vec<StoredRate>, StoreError> {
        let stored = self.rates.lock().await;
        Ok(stored.values().cloned().collect())
    }
}
