//! Stored cache entries and their freshness

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::CacheKey;

/// A cached value with its key and expiry timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The normalized key this entry is stored under
    pub key: CacheKey,
    /// The cached data
    pub value: T,
    /// When the data was fetched from upstream
    pub cached_at: DateTime<Utc>,
    /// When the cache entry expires
    pub expires_at: DateTime<Utc>,
}

/// Freshness of a present entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// `now < expires_at`; served without contacting upstream
    Fresh,
    /// Still stored but no longer served; overwritten on next refresh
    Stale,
}

impl<T> CacheEntry<T> {
    /// Creates an entry fetched at `now` that lives for `ttl`
    pub fn new(key: CacheKey, value: T, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            key,
            value,
            cached_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn state(&self, now: DateTime<Utc>) -> EntryState {
        if now < self.expires_at {
            EntryState::Fresh
        } else {
            EntryState::Stale
        }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == EntryState::Fresh
    }
}
