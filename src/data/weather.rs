//! OpenWeatherMap client and the weather cache
//!
//! This module fetches current conditions from the OpenWeatherMap API and
//! caches them for 30 minutes per `(city, country)`. A request without a
//! country matches a cached entry for the same city in any country.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{get_text, normalize_country_code, validate_city};
use crate::cache::{
    CacheError, CacheKey, CachePolicy, Domain, KeyQuery, ReadThroughCache, Served, UpstreamError,
};

/// Base URL for the OpenWeatherMap current weather API
const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Name used as `source` for live data
pub const WEATHER_SOURCE: &str = "OpenWeatherMap API";

const SETUP_HINT: &str = "Get your free API key from: https://openweathermap.org/api";

/// Latitude/longitude as OpenWeatherMap names them
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// City name as upstream spells it
    pub city: String,
    /// ISO country code reported by upstream
    pub country: String,
    pub coordinates: GeoPoint,
    /// Temperature in Celsius, rounded
    pub temperature: i32,
    /// Apparent temperature in Celsius, rounded
    pub feels_like: i32,
    /// Relative humidity percentage
    pub humidity: u8,
    /// Pressure in hPa
    pub pressure: u32,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Wind direction in degrees
    pub wind_direction: u16,
    pub description: String,
    /// OpenWeatherMap icon code
    pub icon: String,
    /// Visibility in metres
    pub visibility: Option<u32>,
}

/// A city, optionally qualified by country code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub country: Option<String>,
}

impl WeatherQuery {
    /// The `q` parameter sent upstream
    fn location(&self) -> String {
        match &self.country {
            Some(country) => format!("{},{}", self.city, country),
            None => self.city.clone(),
        }
    }
}

/// Top-level OpenWeatherMap response
#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: OwmSys,
    #[serde(default)]
    coord: GeoPoint,
    main: OwmMain,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    visibility: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct OwmSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    pressure: u32,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

/// Parse an OpenWeatherMap response body into a snapshot
fn parse_response(body: &str) -> Result<WeatherSnapshot, UpstreamError> {
    let response: OwmResponse = serde_json::from_str(body)?;
    let condition = response
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| UpstreamError::Unavailable("response has no weather condition".into()))?;

    Ok(WeatherSnapshot {
        city: response.name,
        country: response.sys.country,
        coordinates: response.coord,
        temperature: response.main.temp.round() as i32,
        feels_like: response.main.feels_like.round() as i32,
        humidity: response.main.humidity,
        pressure: response.main.pressure,
        wind_speed: response.wind.speed,
        wind_direction: response.wind.deg,
        description: condition.description,
        icon: condition.icon,
        visibility: response.visibility,
    })
}

/// Client for the OpenWeatherMap API
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    /// Endpoint URL (allows override for testing)
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(client, api_key, OPENWEATHER_BASE_URL)
    }

    pub fn with_base_url(
        client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: base_url.into(),
        }
    }

    /// Fetch current weather for a city
    ///
    /// # Arguments
    /// * `query` - City name and optional ISO country code
    ///
    /// # Returns
    /// * `Ok(WeatherSnapshot)` - Current conditions
    /// * `Err(UpstreamError::Unauthorized)` - No key configured, or the key was rejected
    /// * `Err(UpstreamError::NotFound)` - Upstream does not know the city
    pub async fn fetch_weather(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, UpstreamError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            UpstreamError::Unauthorized(format!(
                "OpenWeatherMap API key is missing. Please add OPENWEATHER_API_KEY to your .env file. {}",
                SETUP_HINT
            ))
        })?;

        let location = query.location();
        let request = self.client.get(&self.base_url).query(&[
            ("q", location.as_str()),
            ("appid", api_key),
            ("units", "metric"),
        ]);

        let context = format!("city {}", location);
        let body = get_text(request, &context).await.map_err(|err| match err {
            UpstreamError::Unauthorized(_) => UpstreamError::Unauthorized(format!(
                "OpenWeatherMap API key is invalid. Please check your OPENWEATHER_API_KEY in .env file. {}",
                SETUP_HINT
            )),
            other => other,
        })?;

        let snapshot = parse_response(&body)?;
        debug!(city = %snapshot.city, country = %snapshot.country, "fetched weather from OpenWeatherMap");
        Ok(snapshot)
    }
}

fn weather_lookup(query: &WeatherQuery) -> KeyQuery {
    KeyQuery::new(vec![
        Some(query.city.to_lowercase()),
        query.country.as_ref().map(|country| country.to_lowercase()),
    ])
}

/// Stored under the requested city and the country upstream reported
fn weather_store_key(query: &WeatherQuery, snapshot: &WeatherSnapshot) -> CacheKey {
    CacheKey::new([query.city.to_lowercase(), snapshot.country.to_lowercase()])
}

const WEATHER_POLICY: CachePolicy<WeatherQuery, WeatherSnapshot> = CachePolicy {
    domain: Domain::Weather,
    lookup: weather_lookup,
    store_key: Some(weather_store_key),
    fallback: None,
};

/// Cached access to current weather
#[derive(Debug, Clone)]
pub struct WeatherService {
    cache: ReadThroughCache,
    client: OpenWeatherClient,
}

impl WeatherService {
    pub fn new(cache: ReadThroughCache, client: OpenWeatherClient) -> Self {
        Self { cache, client }
    }

    /// Current weather for `city`, optionally in `country`
    pub async fn current(
        &self,
        city: &str,
        country: Option<&str>,
    ) -> Result<Served<WeatherSnapshot>, CacheError> {
        let query = WeatherQuery {
            city: validate_city(city)?,
            country: country
                .map(str::trim)
                .filter(|country| !country.is_empty())
                .map(normalize_country_code)
                .transpose()?,
        };

        self.cache
            .get(&WEATHER_POLICY, &query, || self.client.fetch_weather(&query))
            .await
    }
}
