pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::providers::{CzechCentralBank, HttpFeedClient};
use crate::core::CurrencyRateStore;
use crate::store::MemoryRateStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

pub enum AppCommand {
    Import,
    Fetch,
    Rates,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

fn build_importer(
    config: AppConfig,
    store: Arc<dyn CurrencyRateStore>,
) -> Result<CzechCentralBank> {
    let client = HttpFeedClient::new().context("Failed to build HTTP client")?;
    Ok(CzechCentralBank::new(
        Arc::new(config),
        Arc::new(client),
        store,
    ))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;

    match command {
        AppCommand::Import => {
            let store = Arc::new(store::open_rate_store(&config)?);
            let mut importer = build_importer(config, store)?;
            cli::import::run_import(&mut importer).await
        }
        AppCommand::Fetch => {
            // fetch never saves
            let mut importer = build_importer(config, Arc::new(MemoryRateStore::new()))?;
            cli::import::run_fetch(&mut importer).await
        }
        AppCommand::Rates => {
            let store = store::open_rate_store(&config)?;
            cli::rates::run(&store).await
        }
    }
}
