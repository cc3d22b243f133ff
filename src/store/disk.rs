use crate::core::currency::{RateTable, StoredRate, rate_count};
use crate::core::store::{CurrencyRateStore, StoreError, pair_key, validate_rates};
use async_trait::async_trait;
use chrono::Utc;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

const PARTITION: &str = "currency_rates";

/// fjall-backed rate store. Each pair is one JSON-encoded [`StoredRate`] keyed by `BASE/TARGET`.
pub struct DiskRateStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskRateStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let keyspace = fjall::Config::new(path).open()?;
        let partition = keyspace.open_partition(PARTITION, PartitionCreateOptions::default())?;
        debug!("Opened rate store at {}", path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl CurrencyRateStore for DiskRateStore {
    async fn save_rates(&self, rates: &RateTable) -> Result<(), StoreError> {
        validate_rates(rates)?;

        let now = Utc::now();
        let mut batch = self.keyspace.batch();
        for (base, targets) in rates {
            for (target, rate) in targets {
                let entry = StoredRate {
                    base: base.clone(),
                    target: target.clone(),
                    rate: *rate,
                    updated_at: now,
                };
                batch.insert(
                    &self.partition,
                    pair_key(base, target).into_bytes(),
                    serde_json::to_vec(&entry)?,
                );
            }
        }
        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Disk store committed {} pairs", rate_count(rates));
        Ok(())
    }

    async fn load_rates(&self) -> Result<Vec<StoredRate>, StoreError> {
        let mut rates = Vec::new();
        for item in self.partition.iter() {
            let (_key, value) = item?;
            rates.push(serde_json::from_slice(&value)?);
        }
        Ok(rates)
    }
}
