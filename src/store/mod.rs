pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use anyhow::{Context, Result};
pub use disk::DiskRateStore;
pub use memory::MemoryRateStore;

/// Opens the disk store under `<data_path>/rates`, creating it if missing.
pub fn open_rate_store(config: &AppConfig) -> Result<DiskRateStore> {
    let path = config.default_data_path()?.join("rates");
    std::fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create data directory: {}", path.display()))?;
    DiskRateStore::open(&path)
        .with_context(|| format!("Failed to open rate store at {}", path.display()))
}
