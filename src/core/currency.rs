//! Currency rate types shared by importers and stores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base currency code -> target currency code -> rate.
pub type RateTable = HashMap<String, HashMap<String, f64>>;

/// A single persisted rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRate {
    pub base: String,
    pub target: String,
    pub rate: f64,
    pub updated_at: DateTime<Utc>,
}

/// Flattens a table into `(base, target, rate)` triples sorted by base then target.
pub fn sorted_entries(rates: &RateTable) -> Vec<(&str, &str, f64)> {
    let mut entries: Vec<_> = rates
        .iter()
        .flat_map(|(base, targets)| {
            targets
                .iter()
                .map(move |(target, rate)| (base.as_str(), target.as_str(), *rate))
        })
        .collect();
    entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
    entries
}

/// Number of target rates across all bases.
pub fn rate_count(rates: &RateTable) -> usize {
    rates.values().map(HashMap::len).sum()
}
