//! Backing store abstraction
//!
//! A [`CacheStore`] persists JSON payloads per domain. Entries are never
//! evicted by reads; expired entries stay until overwritten or purged.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use super::domain::{CacheKey, Domain, KeyQuery};
use super::entry::CacheEntry;
use super::error::StoreError;

/// An entry as the store sees it: the payload is untyped JSON
pub type StoredEntry = CacheEntry<Value>;

/// Persistence used by the read-through cache
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the matching entry with the latest expiry, fresh or not
    async fn find_one(&self, domain: Domain, query: &KeyQuery)
        -> Result<Option<StoredEntry>, StoreError>;

    /// Returns every entry of a domain, fresh or not
    async fn find_all(&self, domain: Domain) -> Result<Vec<StoredEntry>, StoreError>;

    /// Inserts or replaces the entry stored under `entry.key`
    async fn upsert(&self, domain: Domain, entry: StoredEntry) -> Result<(), StoreError>;

    /// Removes every entry of a domain, returning how many were removed
    async fn delete_all(&self, domain: Domain) -> Result<usize, StoreError>;

    /// Removes entries with `expires_at <= now`, returning how many were removed
    async fn purge_expired(&self, domain: Domain, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

/// Picks the entry with the latest expiry among those matching `query`
pub(crate) fn newest_match<'a, I>(entries: I, query: &KeyQuery) -> Option<&'a StoredEntry>
where
    I: IntoIterator<Item = &'a StoredEntry>,
{
    entries
        .into_iter()
        .filter(|entry| query.matches(&entry.key))
        .max_by_key(|entry| entry.expires_at)
}

/// In-process store, used by tests and when no cache directory is available
#[derive(Debug, Default)]
pub struct MemoryStore {
    domains: RwLock<HashMap<Domain, HashMap<CacheKey, StoredEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries currently held for a domain
    pub async fn len(&self, domain: Domain) -> usize {
        self.domains
            .read()
            .await
            .get(&domain)
            .map_or(0, HashMap::len)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn find_one(
        &self,
        domain: Domain,
        query: &KeyQuery,
    ) -> Result<Option<StoredEntry>, StoreError> {
        let domains = self.domains.read().await;
        let Some(entries) = domains.get(&domain) else {
            return Ok(None);
        };
        Ok(newest_match(entries.values(), query).cloned())
    }

    async fn find_all(&self, domain: Domain) -> Result<Vec<StoredEntry>, StoreError> {
        let domains = self.domains.read().await;
        Ok(domains
            .get(&domain)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert(&self, domain: Domain, entry: StoredEntry) -> Result<(), StoreError> {
        let mut domains = self.domains.write().await;
        domains
            .entry(domain)
            .or_default()
            .insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn delete_all(&self, domain: Domain) -> Result<usize, StoreError> {
        let mut domains = self.domains.write().await;
        Ok(domains.remove(&domain).map_or(0, |entries| entries.len()))
    }

    async fn purge_expired(&self, domain: Domain, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut domains = self.domains.write().await;
        let Some(entries) = domains.get_mut(&domain) else {
            return Ok(0);
        };
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        Ok(before - entries.len())
    }
}
