//! REST Countries client and the country cache
//!
//! The country list is cached as a whole table: a refresh clears the domain
//! and reinserts every country. Single-country reads use the same entries,
//! keyed by upper-case ISO code.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::fallback::{fallback_countries, fallback_country};
use super::{get_text, normalize_country_code, Coordinates};
use crate::cache::{
    CacheError, CacheKey, CachePolicy, Domain, Fallback, KeyQuery, ReadThroughCache, Served,
    TablePolicy, UpstreamError,
};

/// Base URL for the REST Countries API
const REST_COUNTRIES_BASE_URL: &str = "https://restcountries.com/v3.1";

/// Fields requested from REST Countries
const COUNTRY_FIELDS: &str = "name,cca2,capital,region,subregion,population,flag,latlng";

/// Name used as `source` for live data
pub const COUNTRIES_SOURCE: &str = "REST Countries API";

/// A normalized country record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Common name
    pub name: String,
    /// Official name; the common name when upstream omits it
    pub official_name: String,
    /// ISO 3166-1 alpha-2 code, upper case
    pub code: String,
    /// First listed capital, or "N/A"
    pub capital: String,
    pub region: String,
    pub subregion: String,
    pub population: u64,
    /// Flag emoji
    pub flag: String,
    pub coordinates: Coordinates,
}

/// Country record as returned by REST Countries
#[derive(Debug, Default, Deserialize)]
struct RestCountry {
    #[serde(default)]
    name: RestName,
    cca2: Option<String>,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    region: String,
    #[serde(default)]
    subregion: String,
    #[serde(default)]
    population: u64,
    #[serde(default)]
    flag: String,
    #[serde(default)]
    latlng: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RestName {
    #[serde(default)]
    common: String,
    official: Option<String>,
}

/// `/alpha/{code}` answers with an object or a one-element array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(RestCountry),
    Many(Vec<RestCountry>),
}

impl RestCountry {
    /// Maps to a [`Country`]; records without a code are dropped
    fn normalize(self) -> Option<Country> {
        let code = self.cca2.filter(|code| !code.is_empty())?.to_ascii_uppercase();
        let official_name = self
            .name
            .official
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.name.common.clone());
        Some(Country {
            name: self.name.common,
            official_name,
            code,
            capital: self
                .capital
                .into_iter()
                .next()
                .unwrap_or_else(|| "N/A".to_string()),
            region: self.region,
            subregion: self.subregion,
            population: self.population,
            flag: self.flag,
            coordinates: Coordinates {
                lat: self.latlng.first().copied().unwrap_or_default(),
                lng: self.latlng.get(1).copied().unwrap_or_default(),
            },
        })
    }
}

/// Parses the `/all` response into countries sorted by name
fn parse_country_list(body: &str) -> Result<Vec<Country>, UpstreamError> {
    let records: Vec<RestCountry> = serde_json::from_str(body)?;
    let mut countries: Vec<Country> = records.into_iter().filter_map(RestCountry::normalize).collect();
    countries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(countries)
}

/// Parses the `/alpha/{code}` response
fn parse_country(body: &str, code: &str) -> Result<Country, UpstreamError> {
    let record = match serde_json::from_str::<OneOrMany>(body)? {
        OneOrMany::One(record) => Some(record),
        OneOrMany::Many(records) => records.into_iter().next(),
    };
    record
        .and_then(RestCountry::normalize)
        .ok_or_else(|| UpstreamError::NotFound(format!("country {}", code)))
}

/// Client for the REST Countries API
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    http_client: Client,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl RestCountriesClient {
    pub fn new(http_client: Client) -> Self {
        Self::with_base_url(http_client, REST_COUNTRIES_BASE_URL)
    }

    pub fn with_base_url(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    /// Fetches every country
    pub async fn fetch_all(&self) -> Result<Vec<Country>, UpstreamError> {
        let request = self
            .http_client
            .get(format!("{}/all", self.base_url))
            .query(&[("fields", COUNTRY_FIELDS)]);
        let body = get_text(request, "REST Countries country list").await?;
        let countries = parse_country_list(&body)?;
        debug!(count = countries.len(), "fetched countries from REST Countries");
        Ok(countries)
    }

    /// Fetches one country by upper-case ISO code
    pub async fn fetch_one(&self, code: &str) -> Result<Country, UpstreamError> {
        let request = self
            .http_client
            .get(format!("{}/alpha/{}", self.base_url, code))
            .query(&[("fields", COUNTRY_FIELDS)]);
        let context = format!("country {}", code);
        let body = get_text(request, &context).await?;
        parse_country(&body, code)
    }
}

fn country_lookup(code: &str) -> KeyQuery {
    KeyQuery::exact(&country_key(code))
}

fn country_row_key(country: &Country) -> CacheKey {
    country_key(&country.code)
}

/// Countries are keyed by upper-case ISO code
pub fn country_key(code: &str) -> CacheKey {
    CacheKey::new([code.trim().to_ascii_uppercase()])
}

fn country_fallback(code: &str, err: &UpstreamError) -> Option<Fallback<Country>> {
    fallback_country(&code.trim().to_ascii_uppercase()).map(|country| Fallback {
        value: country,
        note: format!("Using built-in country data ({})", err),
    })
}

fn country_list_fallback(err: &UpstreamError) -> Option<Fallback<Vec<Country>>> {
    Some(Fallback {
        value: fallback_countries(),
        note: format!("Using built-in country list due to API issues ({})", err),
    })
}

const COUNTRY_POLICY: CachePolicy<str, Country> = CachePolicy {
    domain: Domain::Countries,
    lookup: country_lookup,
    // Rows are only written by a full list refresh
    store_key: None,
    fallback: Some(country_fallback),
};

const COUNTRY_TABLE: TablePolicy<Country> = TablePolicy {
    domain: Domain::Countries,
    key_of: country_row_key,
    fallback: Some(country_list_fallback),
};

/// Cached access to country data
#[derive(Debug, Clone)]
pub struct CountryService {
    cache: ReadThroughCache,
    client: RestCountriesClient,
}

impl CountryService {
    pub fn new(cache: ReadThroughCache, client: RestCountriesClient) -> Self {
        Self { cache, client }
    }

    /// Every country, sorted by name
    pub async fn list(&self) -> Result<Served<Vec<Country>>, CacheError> {
        let mut served = self
            .cache
            .get_table(&COUNTRY_TABLE, || self.client.fetch_all())
            .await?;
        served.value.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(served)
    }

    /// One country by ISO code, in any case
    ///
    /// Served from the cached list while it is fresh; a live result is not
    /// stored.
    pub async fn get(&self, code: &str) -> Result<Served<Country>, CacheError> {
        let code = normalize_country_code(code)?;
        self.cache
            .get(&COUNTRY_POLICY, code.as_str(), || self.client.fetch_one(&code))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Clock, ManualClock, MemoryStore, Provenance};
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    /// Sample REST Countries `/all` response
    const LIST_RESPONSE: &str = r#"[
        {
            "name": { "common": "France", "official": "French Republic" },
            "cca2": "FR",
            "capital": ["Paris"],
            "region": "Europe",
            "subregion": "Western Europe",
            "population": 67391582,
            "flag": "🇫🇷",
            "latlng": [46.0, 2.0]
        },
        {
            "name": { "common": "Antarctica" },
            "cca2": "AQ",
            "region": "Antarctic",
            "population": 1000,
            "latlng": [-90.0, 0.0]
        },
        {
            "name": { "common": "Nowhere" }
        }
    ]"#;

    /// Unroutable address so every request fails fast
    const DEAD_URL: &str = "http://127.0.0.1:9";

    fn create_test_service() -> (CountryService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = ReadThroughCache::new(Arc::new(MemoryStore::new())).with_clock(clock.clone());
        let http = Client::builder().no_proxy().build().unwrap();
        let client = RestCountriesClient::with_base_url(http, DEAD_URL);
        (CountryService::new(cache, client), clock)
    }

    #[test]
    fn test_parse_country_list_normalizes_and_sorts() {
        let countries = parse_country_list(LIST_RESPONSE).unwrap();

        assert_eq!(countries.len(), 2, "records without cca2 are dropped");
        assert_eq!(countries[0].name, "Antarctica");
        assert_eq!(countries[1].name, "France");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let countries = parse_country_list(LIST_RESPONSE).unwrap();
        let antarctica = &countries[0];

        assert_eq!(antarctica.capital, "N/A");
        assert_eq!(antarctica.official_name, "Antarctica");
        assert_eq!(antarctica.flag, "");
        assert_eq!(antarctica.subregion, "");
    }

    #[test]
    fn test_parse_single_country_object_or_array() {
        let object = r#"{ "name": { "common": "Japan" }, "cca2": "jp", "capital": ["Tokyo"], "latlng": [36.0, 138.0] }"#;
        let country = parse_country(object, "JP").unwrap();
        assert_eq!(country.code, "JP");
        assert_eq!(country.capital, "Tokyo");
        assert_eq!(country.coordinates, Coordinates { lat: 36.0, lng: 138.0 });

        let array = format!("[{}]", object);
        assert_eq!(parse_country(&array, "JP").unwrap().name, "Japan");

        assert!(matches!(parse_country("[]", "JP"), Err(UpstreamError::NotFound(_))));
    }

    #[test]
    fn test_country_key_is_upper_case() {
        assert_eq!(country_key("fr"), CacheKey::new(["FR"]));
        assert_eq!(country_key(" Fr "), CacheKey::new(["FR"]));
    }

    #[tokio::test]
    async fn test_list_falls_back_when_upstream_down() {
        let (service, _clock) = create_test_service();

        let served = service.list().await.unwrap();

        assert_eq!(served.provenance, Provenance::Fallback);
        assert_eq!(served.value.len(), 66);
        assert!(served.note.unwrap().contains("built-in country list"));
    }

    #[tokio::test]
    async fn test_get_served_from_cached_table() {
        let (service, clock) = create_test_service();
        let countries = parse_country_list(LIST_RESPONSE).unwrap();
        for country in countries {
            let entry = crate::cache::CacheEntry::new(
                country_row_key(&country),
                serde_json::to_value(&country).unwrap(),
                clock.now(),
                Duration::days(7),
            );
            service.cache.store().upsert(Domain::Countries, entry).await.unwrap();
        }

        let served = service.get("fr").await.unwrap();
        assert!(served.is_cached());
        assert_eq!(served.value.official_name, "French Republic");

        let listed = service.list().await.unwrap();
        assert!(listed.is_cached());
        assert_eq!(listed.value.len(), 2);
    }

    #[tokio::test]
    async fn test_live_single_country_does_not_replace_list() {
        let (service, _clock) = create_test_service();
        let france = parse_country(LIST_RESPONSE, "FR").unwrap();

        let served = service
            .cache
            .get(&COUNTRY_POLICY, "FR", || async { Ok(france) })
            .await
            .unwrap();
        assert_eq!(served.provenance, Provenance::Live);
        assert!(service
            .cache
            .store()
            .find_all(Domain::Countries)
            .await
            .unwrap()
            .is_empty());

        let listed = service.list().await.unwrap();
        assert_eq!(listed.provenance, Provenance::Fallback);
        assert_eq!(listed.value.len(), 66);
    }

    #[tokio::test]
    async fn test_get_unknown_code_with_upstream_down_is_unavailable() {
        let (service, _clock) = create_test_service();

        let err = service.get("ZZ").await.unwrap_err();
        assert!(matches!(err, CacheError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_get_known_code_with_upstream_down_uses_fallback() {
        let (service, _clock) = create_test_service();

        let served = service.get("de").await.unwrap();
        assert_eq!(served.provenance, Provenance::Fallback);
        assert_eq!(served.value.name, "Germany");
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_code() {
        let (service, _clock) = create_test_service();

        let err = service.get("France").await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidInput(_)));
    }
}
