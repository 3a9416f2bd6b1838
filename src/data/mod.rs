//! External travel data: countries, attractions, weather and exchange rates
//!
//! Each submodule pairs an upstream HTTP client with a service that reads
//! through the shared [`ReadThroughCache`]. [`TravelData`] wires all four
//! together from a [`Config`].

pub mod attractions;
pub mod countries;
pub mod currency;
pub mod fallback;
pub mod weather;

pub use attractions::{
    Attraction, AttractionDetails, AttractionList, AttractionPage, AttractionQuery,
    AttractionService, FoursquareClient,
};
pub use countries::{Country, CountryService, RestCountriesClient};
pub use currency::{Conversion, CurrencyService, ExchangeRateClient, RateTable};
pub use weather::{OpenWeatherClient, WeatherQuery, WeatherService, WeatherSnapshot};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::{
    CacheError, CacheStore, DiskStore, MemoryStore, Provenance, ReadThroughCache, Served,
    UpstreamError,
};
use crate::config::Config;

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Builds the HTTP client shared by every upstream
pub fn http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("tripcache/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Sends a request and returns the body of a successful response
///
/// Non-success statuses are mapped with [`UpstreamError::from_status`];
/// transport errors are `Unavailable`.
pub(crate) async fn get_text(request: RequestBuilder, context: &str) -> Result<String, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::from_status(status, context));
    }
    Ok(response.text().await?)
}

/// Longest accepted city or country name, in characters
pub const MAX_PLACE_NAME: usize = 50;

/// Checks a place name: required, at most [`MAX_PLACE_NAME`] characters
fn validate_place_name(name: &str, label: &str) -> Result<String, CacheError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CacheError::InvalidInput(format!("{} is required", label)));
    }
    if name.chars().count() > MAX_PLACE_NAME {
        return Err(CacheError::InvalidInput(format!("{} is too long", label)));
    }
    Ok(name.to_string())
}

/// Checks a city name: required, at most 50 characters
pub fn validate_city(city: &str) -> Result<String, CacheError> {
    validate_place_name(city, "City name")
}

/// Checks a country name: required, at most 50 characters
pub fn validate_country_name(country: &str) -> Result<String, CacheError> {
    validate_place_name(country, "Country")
}

/// Normalizes a 2-letter ISO country code to upper case
pub fn normalize_country_code(code: &str) -> Result<String, CacheError> {
    let code = code.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CacheError::InvalidInput(format!(
            "'{}' is not a 2-letter country code",
            code
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// Normalizes a 3-letter currency code to upper case
pub fn normalize_currency_code(code: &str) -> Result<String, CacheError> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CacheError::InvalidInput(format!(
            "'{}' is not a valid 3-letter currency code (e.g., USD)",
            code
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// A served value with user-facing provenance fields
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    #[serde(flatten)]
    pub body: T,
    pub cached: bool,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Envelope<T> {
    /// Wraps `served`, naming `upstream` as the source of live data
    pub fn new<V>(served: Served<V>, upstream: &str, body: impl FnOnce(V) -> T) -> Self {
        let source = match served.provenance {
            Provenance::Cache => "Cache".to_string(),
            Provenance::Live => upstream.to_string(),
            Provenance::Fallback => "Fallback data".to_string(),
        };
        Envelope {
            cached: served.is_cached(),
            source,
            note: served.note,
            last_updated: served.cached_at,
            body: body(served.value),
        }
    }
}

/// API keys for upstreams that need them
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub openweather: Option<String>,
    pub foursquare: Option<String>,
}

/// All four data services over one cache
#[derive(Debug, Clone)]
pub struct TravelData {
    pub countries: CountryService,
    pub attractions: AttractionService,
    pub weather: WeatherService,
    pub currency: CurrencyService,
    cache: ReadThroughCache,
}

impl TravelData {
    pub fn new(cache: ReadThroughCache, http: Client, keys: ApiKeys) -> Self {
        Self {
            countries: CountryService::new(cache.clone(), RestCountriesClient::new(http.clone())),
            attractions: AttractionService::new(
                cache.clone(),
                FoursquareClient::new(http.clone(), keys.foursquare),
            ),
            weather: WeatherService::new(
                cache.clone(),
                OpenWeatherClient::new(http.clone(), keys.openweather),
            ),
            currency: CurrencyService::new(cache.clone(), ExchangeRateClient::new(http)),
            cache,
        }
    }

    /// Builds the store, HTTP client and services described by `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let store: Arc<dyn CacheStore> = if config.in_memory {
            Arc::new(MemoryStore::new())
        } else {
            match config.cache_dir.clone().map(DiskStore::with_dir).or_else(DiskStore::new) {
                Some(store) => Arc::new(store),
                None => {
                    warn!("no cache directory available, caching in memory only");
                    Arc::new(MemoryStore::new())
                }
            }
        };
        let cache = ReadThroughCache::new(store).with_timeout(config.timeout);
        let http = http_client(config.timeout)?;
        Ok(Self::new(cache, http, config.api_keys()))
    }

    pub fn cache(&self) -> &ReadThroughCache {
        &self.cache
    }
}
