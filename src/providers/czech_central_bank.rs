//! Importer for the Czech National Bank daily rate feed.
//!
//! The feed is plain text: a date line, a header line and one pipe-delimited
//! row per currency (`country|currency|quantity|code|rate`). Rates are quoted
//! in CZK per `quantity` units with a comma as decimal separator, and are
//! stored inverted, as units of the foreign currency per one CZK.

use crate::core::{
    ConfigSource, CurrencyRateStore, FeedClient, ImportError, MessageLog, RateImporter, RateTable,
    Scope,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub const RATES_URL_KEY: &str = "currency/czech_central_bank/currency_rates_url";
pub const BASE_CURRENCY: &str = "CZK";
const FEED_HEADER: &str = "země|měna|množství|kód|kurz";
const MIN_FIELDS: usize = 5;

/// One data row of the feed, as quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub code: String,
    pub quantity: f64,
    pub rate: f64,
}

impl FeedRow {
    /// Foreign units per one unit of base currency.
    pub fn normalized_rate(&self) -> f64 {
        let per_unit = if self.quantity > 1.0 {
            self.rate / self.quantity
        } else {
            self.rate
        };
        1.0 / per_unit
    }
}

fn is_header_or_empty_line(line: &str) -> bool {
    line.is_empty() || line.trim().contains(FEED_HEADER) || !line.contains('|')
}

fn parse_number(field: &str) -> Option<f64> {
    field
        .trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parses a data row. Returns `None` for rows with fewer than five fields or
/// with a rate that is not a non-zero number. A missing or unparseable
/// quantity counts as one unit.
pub fn parse_line(line: &str) -> Option<FeedRow> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < MIN_FIELDS {
        return None;
    }

    let quantity = parse_number(fields[2]).unwrap_or(1.0);
    let rate = parse_number(fields[4]).filter(|r| *r != 0.0)?;

    Some(FeedRow {
        code: fields[3].trim().to_string(),
        quantity,
        rate,
    })
}

/// Parses a whole feed body into a table keyed by [`BASE_CURRENCY`].
/// Later rows for the same code replace earlier ones.
pub fn parse_rates(body: &str) -> RateTable {
    let mut rates = RateTable::new();

    for line in body.split('\n') {
        if is_header_or_empty_line(line) {
            continue;
        }
        match parse_line(line) {
            Some(row) => {
                rates
                    .entry(BASE_CURRENCY.to_string())
                    .or_default()
                    .insert(row.code.clone(), row.normalized_rate());
            }
            None => debug!(line, "Skipping malformed feed row"),
        }
    }

    rates
}

pub struct CzechCentralBank {
    config: Arc<dyn ConfigSource>,
    client: Arc<dyn FeedClient>,
    store: Arc<dyn CurrencyRateStore>,
    messages: MessageLog,
}

impl CzechCentralBank {
    pub fn new(
        config: Arc<dyn ConfigSource>,
        client: Arc<dyn FeedClient>,
        store: Arc<dyn CurrencyRateStore>,
    ) -> Self {
        Self {
            config,
            client,
            store,
            messages: MessageLog::new(),
        }
    }

    fn rates_url(&self) -> Result<String, ImportError> {
        self.config
            .get_value(RATES_URL_KEY, Scope::Store)
            .ok_or(ImportError::UrlNotConfigured)
    }

    #[instrument(name = "CnbRatesFetch", skip(self, log))]
    async fn current_rates(&self, log: &mut MessageLog) -> RateTable {
        let url = match self.rates_url() {
            Ok(url) => url,
            Err(e) => {
                error!(error = %e, "Cannot fetch currency rates");
                log.error(format!("Error fetching currency rates: {e}"));
                return RateTable::new();
            }
        };

        let body = self.service_response(&url, log).await;
        let rates = parse_rates(&body);
        debug!(
            count = rates.get(BASE_CURRENCY).map_or(0, |r| r.len()),
            "Parsed currency rates"
        );
        rates
    }

    async fn service_response(&self, url: &str, log: &mut MessageLog) -> String {
        match self.client.fetch_body(url).await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, url, "HTTP request for rate feed failed");
                log.error(format!("Error during HTTP request: {e}"));
                String::new()
            }
        }
    }

    async fn save_rates(&self, rates: &RateTable, log: &mut MessageLog) {
        if rates.is_empty() {
            warn!("No currency rates to save");
            log.warning("No currency rates to save.");
            return;
        }

        match self.store.save_rates(rates).await {
            Ok(()) => {
                info!("Currency rates saved");
                log.info("Currency rates successfully saved.");
            }
            Err(e) => {
                error!(error = %e, "Saving currency rates failed");
                log.error(format!("Error saving currency rates: {e}"));
            }
        }
    }
}

#[async_trait]
impl RateImporter for CzechCentralBank {
    async fn import_rates(&mut self) {
        let mut log = MessageLog::new();
        let rates = self.current_rates(&mut log).await;
        self.save_rates(&rates, &mut log).await;
        self.messages = log;
    }

    async fn fetch_rates(&mut self) -> RateTable {
        let mut log = MessageLog::new();
        let rates = self.current_rates(&mut log).await;
        self.messages = log;
        rates
    }

    fn messages(&self) -> &MessageLog {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AppConfig;
    use crate::core::{FeedError, MessageKind};
    use crate::store::memory::MemoryRateStore;
    use std::sync::Mutex;

    const FEED: &str = "16.10.2026 #200
země|měna|množství|kód|kurz
Austrálie|dolar|1|AUD|15,123
EMU|euro|1|EUR|25,300
Maďarsko|forint|100|HUF|7,050
Japonsko|jen|100|JPY|15,600
";

    struct StaticFeed {
        body: Result<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticFeed {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.to_string()),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Err(reason.to_string()),
                requested: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl FeedClient for StaticFeed {
        async fn fetch_body(&self, url: &str) -> Result<String, FeedError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.body.clone().map_err(FeedError::Unavailable)
        }
    }

    fn config_with_url(url: Option<&str>) -> Arc<AppConfig> {
        let mut config = AppConfig::default();
        if let Some(url) = url {
            config
                .scopes
                .store
                .insert(RATES_URL_KEY.to_string(), url.to_string());
        }
        Arc::new(config)
    }

    fn importer(
        url: Option<&str>,
        feed: Arc<StaticFeed>,
        store: Arc<MemoryRateStore>,
    ) -> CzechCentralBank {
        CzechCentralBank::new(config_with_url(url), feed, store)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_unit_quantity_rate_is_inverted() {
        let rates = parse_rates("Německo|euro|1|EUR|25,300");
        assert_close(rates["CZK"]["EUR"], 1.0 / 25.3);
        assert_close(rates["CZK"]["EUR"], 0.039526);
    }

    #[test]
    fn test_quantity_is_normalized_to_per_unit() {
        let rates = parse_rates("Maďarsko|forint|100|HUF|7,050");
        assert_close(rates["CZK"]["HUF"], 1.0 / 0.0705);
        assert_close(rates["CZK"]["HUF"], 14.1844);
    }

    #[test]
    fn test_base_currency_row_is_processed_like_any_other() {
        let rates = parse_rates("Česko|koruna|1|CZK|1,000");
        assert_eq!(rates["CZK"]["CZK"], 1.0);
    }

    #[test]
    fn test_full_feed() {
        let rates = parse_rates(FEED);
        assert_eq!(rates.len(), 1);
        let czk = &rates["CZK"];
        assert_eq!(czk.len(), 4);
        assert_close(czk["AUD"], 1.0 / 15.123);
        assert_close(czk["JPY"], 100.0 / 15.6);
    }

    #[test]
    fn test_header_empty_and_pipeless_lines_are_skipped() {
        let body = "\n  země|měna|množství|kód|kurz  \n16.10.2026 #200\n\n";
        assert!(parse_rates(body).is_empty());
    }

    #[test]
    fn test_rows_with_too_few_fields_are_skipped() {
        let body = "EMU|euro|1|EUR\nfoo|bar\n|";
        assert!(parse_rates(body).is_empty());
        assert_eq!(parse_line("EMU|euro|1|EUR"), None);
    }

    #[test]
    fn test_rows_with_unparseable_numbers_are_skipped() {
        assert_eq!(parse_line("EMU|euro|1|EUR|abc"), None);
        assert_eq!(parse_line("EMU|euro|1|EUR|0,000"), None);
        assert!(parse_rates("EMU|euro|1|EUR|").is_empty());
    }

    #[test]
    fn test_quantity_of_one_or_less_keeps_quoted_rate() {
        for line in [
            "EMU|euro||EUR|25,300",
            "EMU|euro|0|EUR|25,300",
            "EMU|euro|-5|EUR|25,300",
            "EMU|euro|x|EUR|25,300",
        ] {
            let rates = parse_rates(line);
            assert_close(rates["CZK"]["EUR"], 1.0 / 25.3);
        }
    }

    #[test]
    fn test_negative_rate_is_parsed_for_the_store_to_reject() {
        let row = parse_line("EMU|euro|1|EUR|-25,300").unwrap();
        assert_eq!(row.rate, -25.3);
        assert!(row.normalized_rate() < 0.0);
    }

    #[test]
    fn test_fields_are_trimmed_and_extra_fields_ignored() {
        let row = parse_line(" EMU | euro | 1 | EUR | 25,300 |extra\r").unwrap();
        assert_eq!(
            row,
            FeedRow {
                code: "EUR".to_string(),
                quantity: 1.0,
                rate: 25.3,
            }
        );
    }

    #[test]
    fn test_duplicate_code_last_wins() {
        let rates = parse_rates("EMU|euro|1|EUR|25,000\nEMU|euro|1|EUR|20,000");
        assert_close(rates["CZK"]["EUR"], 0.05);
    }

    #[tokio::test]
    async fn test_import_saves_rates() {
        let feed = StaticFeed::ok(FEED);
        let store = Arc::new(MemoryRateStore::new());
        let mut importer = importer(
            Some("https://cnb.example/denni_kurz.txt"),
            feed.clone(),
            store.clone(),
        );

        importer.import_rates().await;

        assert_eq!(
            *feed.requested.lock().unwrap(),
            vec!["https://cnb.example/denni_kurz.txt".to_string()]
        );
        assert_eq!(store.save_calls(), 1);
        let saved = store.last_saved().await.unwrap();
        assert_eq!(saved, parse_rates(FEED));
        assert_eq!(
            importer.messages().texts(),
            vec!["Currency rates successfully saved."]
        );
        assert_eq!(importer.messages().entries()[0].kind, MessageKind::Info);
    }

    #[tokio::test]
    async fn test_missing_url_yields_empty_rates_and_config_error() {
        let feed = StaticFeed::ok(FEED);
        let store = Arc::new(MemoryRateStore::new());
        let mut importer = importer(None, feed.clone(), store.clone());

        let rates = importer.fetch_rates().await;

        assert!(rates.is_empty());
        assert!(feed.requested.lock().unwrap().is_empty());
        assert_eq!(
            importer.messages().texts(),
            vec!["Error fetching currency rates: Currency Rates URL is not configured."]
        );
        assert_eq!(store.save_calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_url_import_skips_save() {
        let store = Arc::new(MemoryRateStore::new());
        let mut importer = importer(None, StaticFeed::ok(FEED), store.clone());

        importer.import_rates().await;

        assert_eq!(store.save_calls(), 0);
        assert_eq!(
            importer.messages().texts(),
            vec![
                "Error fetching currency rates: Currency Rates URL is not configured.",
                "No currency rates to save.",
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_logged_and_processing_continues() {
        let store = Arc::new(MemoryRateStore::new());
        let mut importer = importer(
            Some("https://cnb.example/denni_kurz.txt"),
            StaticFeed::failing("connection refused"),
            store.clone(),
        );

        importer.import_rates().await;

        assert_eq!(store.save_calls(), 0);
        let messages = importer.messages();
        assert_eq!(
            messages.texts(),
            vec![
                "Error during HTTP request: connection refused",
                "No currency rates to save.",
            ]
        );
        assert_eq!(messages.entries()[0].kind, MessageKind::Error);
        assert_eq!(messages.entries()[1].kind, MessageKind::Warning);
    }

    #[tokio::test]
    async fn test_empty_body_yields_empty_rates_and_skips_save() {
        let store = Arc::new(MemoryRateStore::new());
        let mut importer = importer(
            Some("https://cnb.example/denni_kurz.txt"),
            StaticFeed::ok(""),
            store.clone(),
        );

        assert!(importer.fetch_rates().await.is_empty());
        assert!(importer.messages().is_empty());

        importer.import_rates().await;
        assert_eq!(store.save_calls(), 0);
        assert_eq!(
            importer.messages().texts(),
            vec!["No currency rates to save."]
        );
    }

    #[tokio::test]
    async fn test_unparseable_body_yields_empty_rates() {
        let mut importer = importer(
            Some("https://cnb.example/denni_kurz.txt"),
            StaticFeed::ok("<html>Service Unavailable</html>"),
            Arc::new(MemoryRateStore::new()),
        );

        let rates = importer.fetch_rates().await;

        assert!(rates.is_empty());
        assert!(importer.messages().is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_is_logged_not_propagated() {
        let store = Arc::new(MemoryRateStore::rejecting("table is locked"));
        let mut importer = importer(
            Some("https://cnb.example/denni_kurz.txt"),
            StaticFeed::ok(FEED),
            store.clone(),
        );

        importer.import_rates().await;

        assert_eq!(store.save_calls(), 1);
        assert_eq!(
            importer.messages().texts(),
            vec!["Error saving currency rates: table is locked"]
        );
        assert!(importer.messages().has_errors());
    }

    #[tokio::test]
    async fn test_each_run_starts_a_fresh_log() {
        let mut importer = importer(
            None,
            StaticFeed::ok(FEED),
            Arc::new(MemoryRateStore::new()),
        );

        importer.import_rates().await;
        assert_eq!(importer.messages().len(), 2);

        importer.fetch_rates().await;
        assert_eq!(importer.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_does_not_persist() {
        let store = Arc::new(MemoryRateStore::new());
        let mut importer = importer(
            Some("https://cnb.example/denni_kurz.txt"),
            StaticFeed::ok(FEED),
            store.clone(),
        );

        let rates = importer.fetch_rates().await;

        assert_eq!(rates["CZK"].len(), 4);
        assert_eq!(store.save_calls(), 0);
        assert!(importer.messages().is_empty());
    }
}
