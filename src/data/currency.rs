//! Exchange rates from open.er-api.com and currency conversion
//!
//! The cached value for a base currency is its whole rate table, kept for one
//! hour. A target currency missing from a fresh table is reported as a data
//! error rather than triggering a refetch.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{get_text, normalize_currency_code};
use crate::cache::{
    CacheError, CacheKey, CachePolicy, Domain, KeyQuery, ReadThroughCache, Served, UpstreamError,
};

/// Base URL for the open exchange rate API
const EXCHANGE_RATE_BASE_URL: &str = "https://open.er-api.com/v6/latest";

/// Rates from one base currency to every other currency upstream knows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub rates: BTreeMap<String, f64>,
    /// Upstream's own update time, as it formats it
    pub last_updated: Option<String>,
}

impl RateTable {
    pub fn rate(&self, to: &str) -> Option<f64> {
        self.rates.get(to).copied()
    }
}

/// Result of converting an amount between two currencies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    /// `amount * rate`, rounded to 2 decimals
    pub converted_amount: f64,
    pub timestamp: DateTime<Utc>,
    /// Whether the rate came from a fresh cached table
    pub cached: bool,
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    result: String,
    base_code: Option<String>,
    time_last_update_utc: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, f64>,
}

fn parse_rates(body: &str, base: &str) -> Result<RateTable, UpstreamError> {
    let response: RatesResponse = serde_json::from_str(body)?;
    if response.result != "success" {
        return Err(UpstreamError::NotFound(format!("currency {}", base)));
    }
    Ok(RateTable {
        base: response.base_code.unwrap_or_else(|| base.to_string()),
        rates: response.rates,
        last_updated: response.time_last_update_utc,
    })
}

/// Client for the open.er-api.com latest-rates endpoint
#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl ExchangeRateClient {
    pub fn new(http_client: Client) -> Self {
        Self::with_base_url(http_client, EXCHANGE_RATE_BASE_URL)
    }

    pub fn with_base_url(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Fetches the rate table for an upper-case base currency
    pub async fn fetch_rates(&self, base: &str) -> Result<RateTable, UpstreamError> {
        let request = self.http_client.get(format!("{}/{}", self.base_url, base));
        let context = format!("currency {}", base);
        let body = get_text(request, &context).await?;
        let table = parse_rates(&body, base)?;
        debug!(base, count = table.rates.len(), "fetched exchange rates");
        Ok(table)
    }
}

fn rates_key(base: &str) -> CacheKey {
    CacheKey::new([base.to_ascii_uppercase()])
}

fn rates_lookup(base: &str) -> KeyQuery {
    KeyQuery::exact(&rates_key(base))
}

fn rates_store_key(base: &str, _: &RateTable) -> CacheKey {
    rates_key(base)
}

const RATES_POLICY: CachePolicy<str, RateTable> = CachePolicy {
    domain: Domain::ExchangeRates,
    lookup: rates_lookup,
    store_key: Some(rates_store_key),
    fallback: None,
};

/// Cached exchange rates and conversion
#[derive(Debug, Clone)]
pub struct CurrencyService {
    cache: ReadThroughCache,
    client: ExchangeRateClient,
}

impl CurrencyService {
    pub fn new(cache: ReadThroughCache, client: ExchangeRateClient) -> Self {
        Self { cache, client }
    }

    /// The rate table for `base`
    pub async fn rates(&self, base: &str) -> Result<Served<RateTable>, CacheError> {
        let base = normalize_currency_code(base)?;
        self.cache
            .get(&RATES_POLICY, base.as_str(), || self.client.fetch_rates(&base))
            .await
    }

    /// Converts `amount` of `from` into `to`
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<Conversion, CacheError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CacheError::InvalidInput(
                "Amount must be a positive number".to_string(),
            ));
        }
        let from = normalize_currency_code(from)?;
        let to = normalize_currency_code(to)?;

        let served = self.rates(&from).await?;
        let rate = served.value.rate(&to).ok_or_else(|| CacheError::DataError {
            domain: Domain::ExchangeRates,
            message: format!("Exchange rate for {} not available", to),
        })?;

        Ok(Conversion {
            from,
            to,
            amount,
            rate,
            converted_amount: round_cents(amount * rate),
            timestamp: self.cache.now(),
            cached: served.is_cached(),
        })
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
