//! Generic read-through TTL cache
//!
//! [`ReadThroughCache::get`] serves a fresh stored value when there is one,
//! otherwise calls the upstream fetcher, writes the result back with a new
//! expiry and returns it. Upstream failures are classified and either resolved
//! from the domain's fallback dataset or returned to the caller.
//!
//! Concurrent misses for the same key each call upstream and each write back;
//! the last write wins.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::domain::{CacheKey, Domain, KeyQuery};
use super::entry::CacheEntry;
use super::error::{CacheError, StoreError, UpstreamError};
use super::store::{CacheStore, StoredEntry};

/// Default bound on upstream fetches and store operations
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of the current time for expiry decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Where a served value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// A fresh stored entry
    Cache,
    /// A successful upstream fetch, now stored
    Live,
    /// The domain's static dataset, after an upstream failure
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Cache => "cache",
            Provenance::Live => "live",
            Provenance::Fallback => "fallback",
        }
    }
}

/// A value together with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Served<V> {
    pub value: V,
    pub provenance: Provenance,
    /// When the value was fetched upstream; `None` for fallback data
    pub cached_at: Option<DateTime<Utc>>,
    /// Why fallback data was served and how to fix it
    pub note: Option<String>,
}

impl<V> Served<V> {
    pub fn is_cached(&self) -> bool {
        self.provenance == Provenance::Cache
    }

    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> Served<U> {
        Served {
            value: f(self.value),
            provenance: self.provenance,
            cached_at: self.cached_at,
            note: self.note,
        }
    }
}

/// Static data substituted for a failed upstream fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Fallback<V> {
    pub value: V,
    pub note: String,
}

/// Supplies fallback data for a key after a non-NotFound failure
pub type FallbackFn<K, V> = fn(&K, &UpstreamError) -> Option<Fallback<V>>;

/// Per-domain configuration for keyed reads
pub struct CachePolicy<K: ?Sized, V> {
    pub domain: Domain,
    /// Normalizes a request key into a lookup pattern
    pub lookup: fn(&K) -> KeyQuery,
    /// Key a freshly fetched value is stored under; `None` for domains only
    /// a table refresh writes, so a single row never poses as the whole table
    pub store_key: Option<fn(&K, &V) -> CacheKey>,
    pub fallback: Option<FallbackFn<K, V>>,
}

/// Per-domain configuration for whole-table reads
pub struct TablePolicy<V> {
    pub domain: Domain,
    /// Key each row is stored under
    pub key_of: fn(&V) -> CacheKey,
    pub fallback: Option<fn(&UpstreamError) -> Option<Fallback<Vec<V>>>>,
}

/// Read-through cache over a shared [`CacheStore`]
#[derive(Clone)]
pub struct ReadThroughCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    fetch_timeout: Duration,
    store_timeout: Duration,
}

impl fmt::Debug for ReadThroughCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadThroughCache")
            .field("fetch_timeout", &self.fetch_timeout)
            .field("store_timeout", &self.store_timeout)
            .finish_non_exhaustive()
    }
}

impl ReadThroughCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            fetch_timeout: DEFAULT_TIMEOUT,
            store_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the bound applied to upstream fetches and store operations
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.fetch_timeout = limit;
        self.store_timeout = limit;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Serves `key` from cache, upstream or fallback, in that order
    pub async fn get<K, V, F, Fut>(
        &self,
        policy: &CachePolicy<K, V>,
        key: &K,
        fetch: F,
    ) -> Result<Served<V>, CacheError>
    where
        K: ?Sized + Sync,
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, UpstreamError>>,
    {
        let domain = policy.domain;
        let query = (policy.lookup)(key);

        if let Some(entry) = self.lookup(domain, &query).await {
            let now = self.now();
            if entry.is_fresh(now) {
                match decode::<V>(entry) {
                    Some(entry) => {
                        debug!(%domain, key = %query, "cache hit");
                        return Ok(Served {
                            value: entry.value,
                            provenance: Provenance::Cache,
                            cached_at: Some(entry.cached_at),
                            note: None,
                        });
                    }
                    None => warn!(%domain, key = %query, "discarding undecodable cache entry"),
                }
            } else {
                debug!(%domain, key = %query, expired_at = %entry.expires_at, "cache entry stale");
            }
        } else {
            debug!(%domain, key = %query, "cache miss");
        }

        match self.fetch(domain, fetch).await {
            Ok(value) => {
                let now = self.now();
                match policy.store_key {
                    Some(store_key) => {
                        let store_key = store_key(key, &value);
                        info!(%domain, key = %store_key, "refreshed from upstream");
                        match serde_json::to_value(&value) {
                            Ok(json) => {
                                let entry = CacheEntry::new(store_key, json, now, domain.ttl());
                                self.write_back(domain, entry).await;
                            }
                            Err(e) => warn!(%domain, error = %e, "could not encode value for cache"),
                        }
                    }
                    None => debug!(%domain, key = %query, "served live, not written back"),
                }
                Ok(Served {
                    value,
                    provenance: Provenance::Live,
                    cached_at: Some(now),
                    note: None,
                })
            }
            Err(err) if err.is_not_found() => Err(CacheError::from_upstream(domain, err)),
            Err(err) => {
                if let Some(fallback) = policy.fallback.and_then(|supply| supply(key, &err)) {
                    warn!(%domain, key = %query, error = %err, "serving fallback data");
                    return Ok(Served {
                        value: fallback.value,
                        provenance: Provenance::Fallback,
                        cached_at: None,
                        note: Some(fallback.note),
                    });
                }
                warn!(%domain, key = %query, error = %err, "upstream failed with no fallback");
                Err(CacheError::from_upstream(domain, err))
            }
        }
    }

    /// Serves a whole domain: every fresh row, or a full upstream refresh
    ///
    /// A refresh clears the domain before reinserting, so rows upstream no
    /// longer returns do not survive it.
    pub async fn get_table<V, F, Fut>(
        &self,
        policy: &TablePolicy<V>,
        fetch: F,
    ) -> Result<Served<Vec<V>>, CacheError>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<V>, UpstreamError>>,
    {
        let domain = policy.domain;
        let now = self.now();

        let stored = match self.bounded(self.store.find_all(domain)).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(%domain, error = %e, "cache table lookup failed, treating as miss");
                Vec::new()
            }
        };
        let fresh: Vec<CacheEntry<V>> = stored
            .into_iter()
            .filter(|entry| entry.is_fresh(now))
            .filter_map(decode::<V>)
            .collect();

        if !fresh.is_empty() {
            debug!(%domain, rows = fresh.len(), "cache table hit");
            let cached_at = fresh.iter().map(|entry| entry.cached_at).min();
            return Ok(Served {
                value: fresh.into_iter().map(|entry| entry.value).collect(),
                provenance: Provenance::Cache,
                cached_at,
                note: None,
            });
        }

        match self.fetch(domain, fetch).await {
            Ok(rows) => {
                let now = self.now();
                info!(%domain, rows = rows.len(), "refreshed table from upstream");
                self.replace_table(policy, &rows, now).await;
                Ok(Served {
                    value: rows,
                    provenance: Provenance::Live,
                    cached_at: Some(now),
                    note: None,
                })
            }
            Err(err) if err.is_not_found() => Err(CacheError::from_upstream(domain, err)),
            Err(err) => {
                if let Some(fallback) = policy.fallback.and_then(|supply| supply(&err)) {
                    warn!(%domain, error = %err, "serving fallback table");
                    return Ok(Served {
                        value: fallback.value,
                        provenance: Provenance::Fallback,
                        cached_at: None,
                        note: Some(fallback.note),
                    });
                }
                Err(CacheError::from_upstream(domain, err))
            }
        }
    }

    /// Deletes expired entries in `domains`, returning how many were removed
    ///
    /// Domains are purged concurrently; the first failure is returned.
    pub async fn sweep(&self, domains: &[Domain]) -> Result<usize, StoreError> {
        let now = self.now();
        let purges = domains.iter().map(|&domain| async move {
            let purged = self.bounded(self.store.purge_expired(domain, now)).await?;
            if purged > 0 {
                debug!(%domain, purged, "swept expired entries");
            }
            Ok::<usize, StoreError>(purged)
        });
        join_all(purges).await.into_iter().sum()
    }

    async fn fetch<V, F, Fut>(&self, domain: Domain, fetch: F) -> Result<V, UpstreamError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, UpstreamError>>,
    {
        match timeout(self.fetch_timeout, fetch()).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%domain, timeout = ?self.fetch_timeout, "upstream fetch timed out");
                Err(UpstreamError::Unavailable(format!(
                    "upstream did not respond within {}s",
                    self.fetch_timeout.as_secs()
                )))
            }
        }
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        timeout(self.store_timeout, op)
            .await
            .unwrap_or(Err(StoreError::Timeout))
    }

    /// Store lookup; failures are logged and read as a miss
    async fn lookup(&self, domain: Domain, query: &KeyQuery) -> Option<StoredEntry> {
        match self.bounded(self.store.find_one(domain, query)).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(%domain, key = %query, error = %e, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    /// Store write; failures are logged, the caller still gets its value
    async fn write_back(&self, domain: Domain, entry: StoredEntry) {
        let key = entry.key.clone();
        if let Err(e) = self.bounded(self.store.upsert(domain, entry)).await {
            warn!(%domain, %key, error = %e, "cache write-back failed");
        }
    }

    async fn replace_table<V: Serialize>(
        &self,
        policy: &TablePolicy<V>,
        rows: &[V],
        now: DateTime<Utc>,
    ) {
        let domain = policy.domain;
        if let Err(e) = self.bounded(self.store.delete_all(domain)).await {
            warn!(%domain, error = %e, "could not clear cache table before refresh");
        }
        for row in rows {
            match serde_json::to_value(row) {
                Ok(json) => {
                    let entry = CacheEntry::new((policy.key_of)(row), json, now, domain.ttl());
                    self.write_back(domain, entry).await;
                }
                Err(e) => warn!(%domain, error = %e, "could not encode row for cache"),
            }
        }
    }
}

fn decode<V: DeserializeOwned>(entry: StoredEntry) -> Option<CacheEntry<V>> {
    let CacheEntry {
        key,
        value,
        cached_at,
        expires_at,
    } = entry;
    serde_json::from_value(value).ok().map(|value| CacheEntry {
        key,
        value,
        cached_at,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Reading {
        city: String,
        temperature: i32,
    }

    fn weather_lookup(key: &(String, Option<String>)) -> KeyQuery {
        KeyQuery::new(vec![
            Some(key.0.to_lowercase()),
            key.1.as_ref().map(|c| c.to_lowercase()),
        ])
    }

    fn weather_store_key(key: &(String, Option<String>), _: &Reading) -> CacheKey {
        CacheKey::new([
            key.0.to_lowercase(),
            key.1.clone().unwrap_or_else(|| "fr".into()).to_lowercase(),
        ])
    }

    const POLICY: CachePolicy<(String, Option<String>), Reading> = CachePolicy {
        domain: Domain::Weather,
        lookup: weather_lookup,
        store_key: Some(weather_store_key),
        fallback: None,
    };

    fn sample_fallback(_: &(String, Option<String>), err: &UpstreamError) -> Option<Fallback<Reading>> {
        Some(Fallback {
            value: Reading {
                city: "sample".into(),
                temperature: 0,
            },
            note: format!("sample data: {}", err),
        })
    }

    const POLICY_WITH_FALLBACK: CachePolicy<(String, Option<String>), Reading> = CachePolicy {
        domain: Domain::Weather,
        lookup: weather_lookup,
        store_key: Some(weather_store_key),
        fallback: Some(sample_fallback),
    };

    fn key(city: &str, country: Option<&str>) -> (String, Option<String>) {
        (city.to_string(), country.map(str::to_string))
    }

    fn paris(temperature: i32) -> Reading {
        Reading {
            city: "Paris".into(),
            temperature,
        }
    }

    fn create_test_cache() -> (ReadThroughCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = ReadThroughCache::new(Arc::new(MemoryStore::new())).with_clock(clock.clone());
        (cache, clock)
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores() {
        let (cache, clock) = create_test_cache();

        let served = cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();

        assert_eq!(served.provenance, Provenance::Live);
        assert_eq!(served.value, paris(18));

        let stored = cache
            .store()
            .find_one(Domain::Weather, &KeyQuery::exact(&CacheKey::new(["paris", "fr"])))
            .await
            .unwrap()
            .expect("entry should be stored");
        assert_eq!(stored.expires_at, clock.now() + ChronoDuration::minutes(30));
    }

    #[tokio::test]
    async fn test_fresh_entry_served_without_upstream_call() {
        let (cache, clock) = create_test_cache();
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(paris(18))
        };

        cache.get(&POLICY, &key("Paris", Some("FR")), fetch).await.unwrap();
        for _ in 0..5 {
            clock.advance(ChronoDuration::minutes(5));
            let served = cache
                .get(&POLICY, &key("Paris", Some("FR")), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(paris(99))
                })
                .await
                .unwrap();
            assert_eq!(served.provenance, Provenance::Cache);
            assert_eq!(served.value, paris(18));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_one_refresh() {
        let (cache, clock) = create_test_cache();
        let calls = AtomicUsize::new(0);

        cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();
        clock.advance(ChronoDuration::minutes(30));

        let served = cache
            .get(&POLICY, &key("Paris", Some("FR")), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(paris(21))
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(served.provenance, Provenance::Live);
        assert_eq!(served.value, paris(21));

        let stored = cache
            .store()
            .find_one(Domain::Weather, &KeyQuery::exact(&CacheKey::new(["paris", "fr"])))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.expires_at, clock.now() + ChronoDuration::minutes(30));
    }

    #[tokio::test]
    async fn test_case_insensitive_keys_share_entry() {
        let (cache, _clock) = create_test_cache();

        cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();
        let served = cache
            .get(&POLICY, &key("paris", Some("fr")), || async {
                Err(UpstreamError::Unavailable("should not be called".into()))
            })
            .await
            .unwrap();

        assert!(served.is_cached());
    }

    #[tokio::test]
    async fn test_missing_country_matches_any_stored_country() {
        let (cache, _clock) = create_test_cache();

        cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();
        let served = cache
            .get(&POLICY, &key("PARIS", None), || async {
                Err(UpstreamError::Unavailable("should not be called".into()))
            })
            .await
            .unwrap();

        assert!(served.is_cached());
    }

    #[tokio::test]
    async fn test_failure_without_fallback_propagates() {
        let (cache, _clock) = create_test_cache();

        let err = cache
            .get(&POLICY, &key("Paris", None), || async {
                Err::<Reading, _>(UpstreamError::Unavailable("connection refused".into()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CacheError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_unauthorized_without_fallback_is_configuration_error() {
        let (cache, _clock) = create_test_cache();

        let err = cache
            .get(&POLICY, &key("Paris", None), || async {
                Err::<Reading, _>(UpstreamError::Unauthorized("missing API key".into()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CacheError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_fallback_served_on_unavailable() {
        let (cache, _clock) = create_test_cache();

        let served = cache
            .get(&POLICY_WITH_FALLBACK, &key("Paris", None), || async {
                Err(UpstreamError::Unavailable("HTTP 503".into()))
            })
            .await
            .unwrap();

        assert_eq!(served.provenance, Provenance::Fallback);
        assert_eq!(served.value.city, "sample");
        assert!(served.note.unwrap().contains("HTTP 503"));
        assert!(served.cached_at.is_none());
    }

    #[tokio::test]
    async fn test_not_found_never_uses_fallback() {
        let (cache, _clock) = create_test_cache();

        let err = cache
            .get(&POLICY_WITH_FALLBACK, &key("Atlantis", None), || async {
                Err(UpstreamError::NotFound("city Atlantis".into()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CacheError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_fallback_is_not_stored() {
        let (cache, _clock) = create_test_cache();

        cache
            .get(&POLICY_WITH_FALLBACK, &key("Paris", Some("FR")), || async {
                Err(UpstreamError::Unavailable("down".into()))
            })
            .await
            .unwrap();

        let all = cache.store().find_all(Domain::Weather).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_policy_without_store_key_does_not_write_back() {
        let (cache, _clock) = create_test_cache();
        let read_only = CachePolicy {
            store_key: None,
            ..POLICY
        };

        let served = cache
            .get(&read_only, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();

        assert_eq!(served.provenance, Provenance::Live);
        assert!(cache.store().find_all(Domain::Weather).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stale_entry_is_not_served_on_failure() {
        let (cache, clock) = create_test_cache();

        cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();
        clock.advance(ChronoDuration::minutes(35));

        let result = cache
            .get(&POLICY, &key("Paris", Some("FR")), || async {
                Err::<Reading, _>(UpstreamError::Unavailable("down".into()))
            })
            .await;

        assert!(matches!(result, Err(CacheError::UpstreamUnavailable { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_upstream_times_out() {
        let (cache, _clock) = create_test_cache();

        let err = cache
            .get(&POLICY, &key("Paris", None), || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(paris(18))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CacheError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_keys_do_not_interfere() {
        let (cache, _clock) = create_test_cache();

        cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();
        let _ = cache
            .get(&POLICY, &key("Lyon", Some("FR")), || async {
                Err::<Reading, _>(UpstreamError::Unavailable("down".into()))
            })
            .await;

        let served = cache
            .get(&POLICY, &key("Paris", Some("FR")), || async {
                Err(UpstreamError::Unavailable("should not be called".into()))
            })
            .await
            .unwrap();
        assert!(served.is_cached());
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_refetched() {
        let (cache, clock) = create_test_cache();
        let bogus = CacheEntry::new(
            CacheKey::new(["paris", "fr"]),
            serde_json::json!({ "unexpected": true }),
            clock.now(),
            ChronoDuration::minutes(30),
        );
        cache.store().upsert(Domain::Weather, bogus).await.unwrap();

        let served = cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();
        assert_eq!(served.provenance, Provenance::Live);
    }

    struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn find_one(&self, _: Domain, _: &KeyQuery) -> Result<Option<StoredEntry>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
        async fn find_all(&self, _: Domain) -> Result<Vec<StoredEntry>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
        async fn upsert(&self, _: Domain, _: StoredEntry) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
        async fn delete_all(&self, _: Domain) -> Result<usize, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
        async fn purge_expired(&self, _: Domain, _: DateTime<Utc>) -> Result<usize, StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk gone")))
        }
    }

    #[tokio::test]
    async fn test_store_failure_reads_as_miss() {
        let cache = ReadThroughCache::new(Arc::new(BrokenStore));

        let served = cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();

        assert_eq!(served.provenance, Provenance::Live);
        assert!(cache.sweep(&[Domain::Weather]).await.is_err());
    }

    fn row_key(row: &Reading) -> CacheKey {
        CacheKey::new([row.city.to_uppercase()])
    }

    fn table_fallback(_: &UpstreamError) -> Option<Fallback<Vec<Reading>>> {
        Some(Fallback {
            value: vec![paris(0)],
            note: "built-in list".into(),
        })
    }

    const TABLE: TablePolicy<Reading> = TablePolicy {
        domain: Domain::Countries,
        key_of: row_key,
        fallback: Some(table_fallback),
    };

    #[tokio::test]
    async fn test_table_refresh_replaces_all_rows() {
        let (cache, clock) = create_test_cache();

        cache
            .get_table(&TABLE, || async {
                Ok(vec![paris(1), Reading { city: "Lyon".into(), temperature: 2 }])
            })
            .await
            .unwrap();
        clock.advance(ChronoDuration::days(8));

        let served = cache
            .get_table(&TABLE, || async { Ok(vec![paris(3)]) })
            .await
            .unwrap();
        assert_eq!(served.provenance, Provenance::Live);

        let all = cache.store().find_all(Domain::Countries).await.unwrap();
        assert_eq!(all.len(), 1, "stale rows should be cleared on refresh");
    }

    #[tokio::test]
    async fn test_table_served_from_cache_while_fresh() {
        let (cache, clock) = create_test_cache();

        cache
            .get_table(&TABLE, || async { Ok(vec![paris(1)]) })
            .await
            .unwrap();
        clock.advance(ChronoDuration::days(6));

        let served = cache
            .get_table(&TABLE, || async {
                Err(UpstreamError::Unavailable("should not be called".into()))
            })
            .await
            .unwrap();
        assert!(served.is_cached());
        assert_eq!(served.value, vec![paris(1)]);
    }

    #[tokio::test]
    async fn test_table_fallback_on_failure() {
        let (cache, _clock) = create_test_cache();

        let served = cache
            .get_table(&TABLE, || async {
                Err(UpstreamError::Unavailable("down".into()))
            })
            .await
            .unwrap();
        assert_eq!(served.provenance, Provenance::Fallback);
        assert_eq!(served.note.as_deref(), Some("built-in list"));
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let (cache, clock) = create_test_cache();

        cache
            .get(&POLICY, &key("Paris", Some("FR")), || async { Ok(paris(18)) })
            .await
            .unwrap();
        clock.advance(ChronoDuration::minutes(40));
        cache
            .get(&POLICY, &key("Lyon", Some("FR")), || async { Ok(paris(12)) })
            .await
            .unwrap();

        let removed = cache.sweep(&Domain::ALL).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(cache.store().find_all(Domain::Weather).await.unwrap().len(), 1);
    }
}
