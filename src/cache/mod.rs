//! Read-through TTL cache
//!
//! This module provides one generic cache, [`ReadThroughCache`], shared by every
//! external-data domain. A lookup is served from the backing store while the
//! entry is fresh, otherwise from the upstream fetcher (refreshing the store),
//! otherwise from the domain's static fallback data if it has any. Every
//! served value carries a [`Provenance`] tag.

mod domain;
mod entry;
mod error;
mod housekeeping;
mod manager;
mod read_through;
mod store;

pub use domain::{CacheKey, Domain, KeyQuery};
pub use entry::{CacheEntry, EntryState};
pub use error::{CacheError, StoreError, UpstreamError};
pub use housekeeping::{Housekeeper, SweepConfig, SweepMessage};
pub use manager::DiskStore;
pub use read_through::{
    CachePolicy, Clock, Fallback, FallbackFn, ManualClock, Provenance, ReadThroughCache, Served,
    SystemClock, TablePolicy, DEFAULT_TIMEOUT,
};
pub use store::{CacheStore, MemoryStore, StoredEntry};
