//! Cache namespaces and key types
//!
//! Each [`Domain`] is an independent namespace with its own fixed TTL. Keys are
//! ordered lists of string components; lookups use a [`KeyQuery`] whose
//! components may be wildcards.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// One of the independent cache namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Country records, keyed by ISO code
    Countries,
    /// Attraction searches, keyed by (country, city)
    Attractions,
    /// Current weather, keyed by (city, country)
    Weather,
    /// Exchange-rate tables, keyed by base currency
    ExchangeRates,
}

impl Domain {
    /// Every domain, in a stable order
    pub const ALL: [Domain; 4] = [
        Domain::Countries,
        Domain::Attractions,
        Domain::Weather,
        Domain::ExchangeRates,
    ];

    /// Stable name used for directories and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Countries => "countries",
            Domain::Attractions => "attractions",
            Domain::Weather => "weather",
            Domain::ExchangeRates => "exchange_rates",
        }
    }

    /// Time-to-live for entries in this domain
    pub fn ttl(&self) -> Duration {
        match self {
            Domain::Countries => Duration::days(7),
            Domain::Attractions => Duration::hours(24),
            Domain::Weather => Duration::minutes(30),
            Domain::ExchangeRates => Duration::hours(1),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully specified key within a domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

/// A lookup pattern: `None` components match anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyQuery(Vec<Option<String>>);

impl KeyQuery {
    pub fn new(parts: Vec<Option<String>>) -> Self {
        Self(parts)
    }

    /// A query matching exactly one key
    pub fn exact(key: &CacheKey) -> Self {
        Self(key.parts().iter().cloned().map(Some).collect())
    }

    /// Returns the key this query names, if it has no wildcards
    pub fn as_exact(&self) -> Option<CacheKey> {
        self.0
            .iter()
            .cloned()
            .collect::<Option<Vec<String>>>()
            .map(CacheKey)
    }

    /// Case-insensitive component-wise match
    pub fn matches(&self, key: &CacheKey) -> bool {
        self.0.len() == key.0.len()
            && self
                .0
                .iter()
                .zip(key.0.iter())
                .all(|(want, have)| match want {
                    Some(want) => want.eq_ignore_ascii_case(have),
                    None => true,
                })
    }
}

impl fmt::Display for KeyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self
            .0
            .iter()
            .map(|p| p.as_deref().unwrap_or("*"))
            .collect();
        f.write_str(&parts.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_ttls() {
        assert_eq!(Domain::Countries.ttl(), Duration::days(7));
        assert_eq!(Domain::Attractions.ttl(), Duration::hours(24));
        assert_eq!(Domain::Weather.ttl(), Duration::minutes(30));
        assert_eq!(Domain::ExchangeRates.ttl(), Duration::hours(1));
    }

    #[test]
    fn test_exact_query_matches_ignoring_case() {
        let key = CacheKey::new(["paris", "FR"]);
        let query = KeyQuery::new(vec![Some("Paris".into()), Some("fr".into())]);
        assert!(query.matches(&key));
    }

    #[test]
    fn test_wildcard_component_matches_any_value() {
        let query = KeyQuery::new(vec![Some("paris".into()), None]);
        assert!(query.matches(&CacheKey::new(["paris", "fr"])));
        assert!(query.matches(&CacheKey::new(["paris", "us"])));
        assert!(!query.matches(&CacheKey::new(["lyon", "fr"])));
    }

    #[test]
    fn test_query_length_must_match() {
        let query = KeyQuery::new(vec![Some("usd".into())]);
        assert!(!query.matches(&CacheKey::new(["usd", "eur"])));
    }

    #[test]
    fn test_as_exact() {
        let key = CacheKey::new(["france", "all"]);
        assert_eq!(KeyQuery::exact(&key).as_exact(), Some(key));
        assert_eq!(KeyQuery::new(vec![Some("paris".into()), None]).as_exact(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CacheKey::new(["paris", "fr"]).to_string(), "paris/fr");
        assert_eq!(
            KeyQuery::new(vec![Some("paris".into()), None]).to_string(),
            "paris/*"
        );
    }
}
