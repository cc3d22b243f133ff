//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod feed;
pub mod import;
pub mod log;
pub mod message;
pub mod store;

// Re-export main types for cleaner imports
pub use config::{ConfigSource, Scope};
pub use currency::{RateTable, StoredRate};
pub use feed::{FeedClient, FeedError};
pub use import::{ImportError, RateImporter};
pub use message::{Message, MessageKind, MessageLog};
pub use store::{CurrencyRateStore, StoreError};
