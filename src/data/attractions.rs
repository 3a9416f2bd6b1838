//! Foursquare Places client and the attractions cache
//!
//! Searches are cached per `(country, city)` for 24 hours. Upstream is always
//! asked for the maximum page so that any requested limit can be served from
//! one cached list. Place details are not cached.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::fallback::{
    invalid_key_details, key_required_details, mock_attractions, sample_details,
    unavailable_details,
};
use super::{get_text, validate_city, validate_country_name, Coordinates};
use crate::cache::{
    CacheError, CacheKey, CachePolicy, Domain, Fallback, KeyQuery, Provenance, ReadThroughCache,
    Served, UpstreamError,
};

/// Base URL for the Foursquare Places API
const FOURSQUARE_BASE_URL: &str = "https://api.foursquare.com/v3";

/// Arts, landmarks, nightlife-adjacent venues and dining
const SEARCH_CATEGORIES: &str = "16000,10000,12000,13000";

const SEARCH_FIELDS: &str = "fsq_id,name,categories,location,distance,rating,price,website,tel,email,photos,description,hours,tips";

const DETAIL_FIELDS: &str = "fsq_id,name,categories,location,rating,price,website,tel,email,photos,description,hours,tips";

/// Largest page Foursquare returns, and the largest limit callers may ask for
pub const MAX_LIMIT: usize = 50;

/// Limit used when the caller does not give one
pub const DEFAULT_LIMIT: usize = 20;

/// Name used as `source` for live data
pub const ATTRACTIONS_SOURCE: &str = "Foursquare API";

/// Message carried by the `Unauthorized` error raised when no key is configured
const MISSING_KEY: &str = "FOURSQUARE_API_KEY is not set";

const SETUP_HINT: &str = "Get your free API key from: https://developer.foursquare.com/";

/// Most tips kept on a details page
const MAX_DETAIL_TIPS: usize = 5;

/// Most photos kept on a details page
const MAX_DETAIL_PHOTOS: usize = 3;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AttractionLocation {
    pub address: String,
    pub locality: String,
    pub region: String,
    pub country: String,
    pub postcode: String,
    pub coordinates: Coordinates,
}

/// Photo reference; the URL is `{prefix}{width}x{height}{suffix}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl Photo {
    /// Link to a 300x200 rendition
    pub fn thumbnail(&self) -> PhotoLink {
        PhotoLink {
            url: format!("{}300x200{}", self.prefix, self.suffix),
            width: 300,
            height: 200,
        }
    }
}

/// A normalized point of interest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attraction {
    pub id: String,
    pub name: String,
    pub categories: Vec<Category>,
    pub location: AttractionLocation,
    /// Metres from the search centre
    pub distance: u32,
    /// Foursquare rating out of 10, 0 when unrated
    pub rating: f64,
    /// Price tier 1-4, 0 when unknown
    pub price: u8,
    pub website: String,
    pub tel: String,
    pub email: String,
    pub photos: Vec<Photo>,
    pub description: String,
    pub hours: Option<serde_json::Value>,
    pub tips: Vec<String>,
}

/// One cached search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttractionList {
    /// `"City, Country"` or just the country, as sent upstream
    pub search_location: String,
    pub attractions: Vec<Attraction>,
}

/// A search result cut to the requested limit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttractionPage {
    pub location: String,
    /// Size of the full result before the limit was applied
    pub total: usize,
    pub attractions: Vec<Attraction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoLink {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Place details, shaped for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttractionDetails {
    pub id: String,
    pub name: String,
    pub categories: Vec<Category>,
    pub address: String,
    pub rating: f64,
    pub price: u8,
    pub description: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub photos: Vec<PhotoLink>,
    pub hours: Option<serde_json::Value>,
    pub tips: Vec<String>,
}

/// A country, optionally narrowed to one city
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttractionQuery {
    pub country: String,
    pub city: Option<String>,
}

impl AttractionQuery {
    /// Trims both names; a blank city means the whole country
    pub fn new(country: &str, city: Option<&str>) -> Result<Self, CacheError> {
        let city = match city.map(str::trim).filter(|city| !city.is_empty()) {
            Some(city) => Some(validate_city(city)?),
            None => None,
        };
        Ok(Self {
            country: validate_country_name(country)?,
            city,
        })
    }

    /// The `near` parameter sent upstream
    pub fn search_location(&self) -> String {
        match &self.city {
            Some(city) => format!("{}, {}", city, self.country),
            None => self.country.clone(),
        }
    }

    /// `[country, city or "all"]`, lower-cased
    pub fn key(&self) -> CacheKey {
        CacheKey::new([
            self.country.to_lowercase(),
            self.city
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_else(|| "all".to_string()),
        ])
    }
}

/// Place record as returned by Foursquare
#[derive(Debug, Default, Deserialize)]
struct FsqPlace {
    #[serde(default)]
    fsq_id: String,
    #[serde(default)]
    name: String,
    categories: Option<Vec<Category>>,
    location: Option<FsqLocation>,
    distance: Option<u32>,
    rating: Option<f64>,
    price: Option<u8>,
    website: Option<String>,
    tel: Option<String>,
    email: Option<String>,
    photos: Option<Vec<Photo>>,
    description: Option<String>,
    hours: Option<serde_json::Value>,
    tips: Option<Vec<FsqTip>>,
}

#[derive(Debug, Default, Deserialize)]
struct FsqLocation {
    address: Option<String>,
    formatted_address: Option<String>,
    locality: Option<String>,
    region: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Tips arrive either as bare strings or as objects with a `text` field
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FsqTip {
    Text(String),
    Object {
        #[serde(default)]
        text: String,
    },
}

impl FsqTip {
    fn into_text(self) -> String {
        match self {
            FsqTip::Text(text) | FsqTip::Object { text } => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<FsqPlace>,
}

fn tip_texts(tips: Option<Vec<FsqTip>>) -> Vec<String> {
    tips.unwrap_or_default()
        .into_iter()
        .map(FsqTip::into_text)
        .filter(|tip| !tip.is_empty())
        .collect()
}

impl FsqPlace {
    fn normalize(self) -> Attraction {
        let location = self.location.unwrap_or_default();
        Attraction {
            id: self.fsq_id,
            name: self.name,
            categories: self.categories.unwrap_or_default(),
            location: AttractionLocation {
                address: location.address.unwrap_or_default(),
                locality: location.locality.unwrap_or_default(),
                region: location.region.unwrap_or_default(),
                country: location.country.unwrap_or_default(),
                postcode: location.postcode.unwrap_or_default(),
                coordinates: Coordinates {
                    lat: location.latitude.unwrap_or_default(),
                    lng: location.longitude.unwrap_or_default(),
                },
            },
            distance: self.distance.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            tel: self.tel.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            photos: self.photos.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            hours: self.hours,
            tips: tip_texts(self.tips),
        }
    }

    fn into_details(self) -> AttractionDetails {
        let location = self.location.unwrap_or_default();
        AttractionDetails {
            id: self.fsq_id,
            name: self.name,
            categories: self.categories.unwrap_or_default(),
            address: location
                .formatted_address
                .or(location.address)
                .unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            phone: self.tel.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            photos: self
                .photos
                .unwrap_or_default()
                .iter()
                .take(MAX_DETAIL_PHOTOS)
                .map(Photo::thumbnail)
                .collect(),
            hours: self.hours,
            tips: tip_texts(self.tips)
                .into_iter()
                .filter(|tip| looks_english(tip))
                .take(MAX_DETAIL_TIPS)
                .collect(),
        }
    }
}

const COMMON_ENGLISH_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "can", "must", "shall", "this", "that", "these",
    "those", "a", "an", "you", "i", "we", "they", "he", "she", "it",
];

/// Heuristic: a common English word, or an opening written in plain ASCII
fn looks_english(tip: &str) -> bool {
    let has_common_word = tip
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|word| COMMON_ENGLISH_WORDS.contains(&word.to_lowercase().as_str()));
    let plain_opening = tip.chars().take(50).all(|c| {
        c.is_ascii_alphanumeric() || c.is_whitespace() || ".,!?'\"()-".contains(c)
    });
    has_common_word || plain_opening
}

fn parse_search(body: &str, search_location: String) -> Result<AttractionList, UpstreamError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(AttractionList {
        search_location,
        attractions: response.results.into_iter().map(FsqPlace::normalize).collect(),
    })
}

fn parse_details(body: &str) -> Result<AttractionDetails, UpstreamError> {
    let place: FsqPlace = serde_json::from_str(body)?;
    Ok(place.into_details())
}

/// Client for the Foursquare Places API
#[derive(Debug, Clone)]
pub struct FoursquareClient {
    http_client: Client,
    api_key: Option<String>,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl FoursquareClient {
    pub fn new(http_client: Client, api_key: Option<String>) -> Self {
        Self::with_base_url(http_client, api_key, FOURSQUARE_BASE_URL)
    }

    pub fn with_base_url(
        http_client: Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: base_url.into(),
        }
    }

    fn api_key(&self) -> Result<&str, UpstreamError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| UpstreamError::Unauthorized(MISSING_KEY.to_string()))
    }

    /// Fetches the top-rated places near the query location
    pub async fn search(&self, query: &AttractionQuery) -> Result<AttractionList, UpstreamError> {
        let api_key = self.api_key()?;
        let search_location = query.search_location();
        let limit = MAX_LIMIT.to_string();
        let request = self
            .http_client
            .get(format!("{}/places/search", self.base_url))
            .header("Authorization", api_key)
            .header("Accept", "application/json")
            .query(&[
                ("near", search_location.as_str()),
                ("categories", SEARCH_CATEGORIES),
                ("limit", limit.as_str()),
                ("sort", "RATING"),
                ("fields", SEARCH_FIELDS),
            ]);
        let context = format!("attractions near {}", search_location);
        let body = get_text(request, &context).await?;
        let list = parse_search(&body, search_location)?;
        debug!(count = list.attractions.len(), "fetched attractions from Foursquare");
        Ok(list)
    }

    /// Fetches one place by Foursquare id
    pub async fn details(&self, id: &str) -> Result<AttractionDetails, UpstreamError> {
        let api_key = self.api_key()?;
        let request = self
            .http_client
            .get(format!("{}/places/{}", self.base_url, id))
            .header("Authorization", api_key)
            .header("Accept", "application/json")
            .query(&[("fields", DETAIL_FIELDS)]);
        let context = format!("attraction {}", id);
        let body = get_text(request, &context).await?;
        parse_details(&body)
    }
}

fn attraction_lookup(query: &AttractionQuery) -> KeyQuery {
    KeyQuery::exact(&query.key())
}

fn attraction_store_key(query: &AttractionQuery, _: &AttractionList) -> CacheKey {
    query.key()
}

fn attraction_fallback(
    query: &AttractionQuery,
    err: &UpstreamError,
) -> Option<Fallback<AttractionList>> {
    let note = match err {
        UpstreamError::Unauthorized(message) if message == MISSING_KEY => format!(
            "Using mock data. Add FOURSQUARE_API_KEY to .env for real data. {}",
            SETUP_HINT
        ),
        UpstreamError::Unauthorized(_) => format!(
            "Invalid Foursquare API key. Using mock data. Please check your FOURSQUARE_API_KEY in .env file. {}",
            SETUP_HINT
        ),
        other => format!("Foursquare API error, using fallback data ({})", other),
    };
    Some(Fallback {
        value: AttractionList {
            search_location: query.search_location(),
            attractions: mock_attractions(&query.country),
        },
        note,
    })
}

const ATTRACTION_POLICY: CachePolicy<AttractionQuery, AttractionList> = CachePolicy {
    domain: Domain::Attractions,
    lookup: attraction_lookup,
    store_key: Some(attraction_store_key),
    fallback: Some(attraction_fallback),
};

/// Cached access to points of interest
#[derive(Debug, Clone)]
pub struct AttractionService {
    cache: ReadThroughCache,
    client: FoursquareClient,
}

impl AttractionService {
    pub fn new(cache: ReadThroughCache, client: FoursquareClient) -> Self {
        Self { cache, client }
    }

    /// Top-rated attractions in a country or city, at most `limit` of them
    pub async fn search(
        &self,
        country: &str,
        city: Option<&str>,
        limit: usize,
    ) -> Result<Served<AttractionPage>, CacheError> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(CacheError::InvalidInput(format!(
                "Limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        let query = AttractionQuery::new(country, city)?;
        let served = self
            .cache
            .get(&ATTRACTION_POLICY, &query, || self.client.search(&query))
            .await?;

        let location = query.search_location();
        Ok(served.map(|list| AttractionPage {
            location,
            total: list.attractions.len(),
            attractions: list.attractions.into_iter().take(limit).collect(),
        }))
    }

    /// Details for one place; never cached
    ///
    /// Ids starting with `mock_`, a missing or rejected key and upstream
    /// outages all yield placeholder details tagged as fallback data. Only a
    /// confirmed unknown id is an error.
    pub async fn details(&self, id: &str) -> Result<Served<AttractionDetails>, CacheError> {
        let id = id.split(',').next().unwrap_or_default().trim();
        if id.is_empty() {
            return Err(CacheError::InvalidInput("Attraction ID is required".to_string()));
        }

        if id.starts_with("mock_") {
            return Ok(placeholder(
                sample_details(id),
                "Sample data for a mock attraction id".to_string(),
            ));
        }

        match self.client.details(id).await {
            Ok(details) => Ok(Served {
                value: details,
                provenance: Provenance::Live,
                cached_at: Some(self.cache.now()),
                note: None,
            }),
            Err(UpstreamError::Unauthorized(message)) if message == MISSING_KEY => {
                Ok(placeholder(
                    key_required_details(id),
                    format!(
                        "Add FOURSQUARE_API_KEY to .env file to get real attraction details. {}",
                        SETUP_HINT
                    ),
                ))
            }
            Err(UpstreamError::Unauthorized(message)) => {
                warn!(%id, %message, "Foursquare rejected the API key");
                Ok(placeholder(
                    invalid_key_details(id),
                    format!("Please check your FOURSQUARE_API_KEY in .env file. {}", SETUP_HINT),
                ))
            }
            Err(err) if err.is_not_found() => {
                Err(CacheError::from_upstream(Domain::Attractions, err))
            }
            Err(err) => {
                warn!(%id, error = %err, "attraction details unavailable");
                Ok(placeholder(
                    unavailable_details(id),
                    format!("Details temporarily unavailable ({})", err),
                ))
            }
        }
    }
}

fn placeholder(details: AttractionDetails, note: String) -> Served<AttractionDetails> {
    Served {
        value: details,
        provenance: Provenance::Fallback,
        cached_at: None,
        note: Some(note),
    }
}
