//! Disk-backed cache store
//!
//! Stores each entry as a JSON file under `<cache_dir>/<domain>/`, with the
//! entry's key and expiry timestamps alongside the payload.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use tokio::fs;
use tracing::warn;

use super::domain::{CacheKey, Domain, KeyQuery};
use super::error::StoreError;
use super::store::{newest_match, CacheStore, StoredEntry};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persists cache entries to JSON files
///
/// The store uses an XDG-compliant cache directory (`~/.cache/tripcache/` on
/// Linux) unless one is given explicitly. Writes go to a temporary file that is
/// renamed into place, so concurrent writers to the same key resolve to
/// last-write-wins and readers never see a partial file.
#[derive(Debug, Clone)]
pub struct DiskStore {
    /// Directory where domain subdirectories are created
    cache_dir: PathBuf,
}

impl DiskStore {
    /// Creates a DiskStore in the XDG cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "tripcache")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a DiskStore rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn domain_dir(&self, domain: Domain) -> PathBuf {
        self.cache_dir.join(domain.as_str())
    }

    /// Returns the path of the file holding `key`
    fn entry_path(&self, domain: Domain, key: &CacheKey) -> PathBuf {
        self.domain_dir(domain).join(format!("{}.json", file_stem(key)))
    }

    async fn read_entry(path: &Path) -> Result<Option<StoredEntry>, StoreError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads every parseable entry of a domain, skipping corrupt files
    async fn scan(&self, domain: Domain) -> Result<Vec<(PathBuf, StoredEntry)>, StoreError> {
        let mut dir = match fs::read_dir(self.domain_dir(domain)).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match Self::read_entry(&path).await {
                Ok(Some(entry)) => entries.push((path, entry)),
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable cache file"),
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl CacheStore for DiskStore {
    async fn find_one(
        &self,
        domain: Domain,
        query: &KeyQuery,
    ) -> Result<Option<StoredEntry>, StoreError> {
        if let Some(key) = query.as_exact() {
            let entry = Self::read_entry(&self.entry_path(domain, &key)).await?;
            return Ok(entry.filter(|entry| query.matches(&entry.key)));
        }

        let entries = self.scan(domain).await?;
        Ok(newest_match(entries.iter().map(|(_, entry)| entry), query).cloned())
    }

    async fn find_all(&self, domain: Domain) -> Result<Vec<StoredEntry>, StoreError> {
        Ok(self
            .scan(domain)
            .await?
            .into_iter()
            .map(|(_, entry)| entry)
            .collect())
    }

    async fn upsert(&self, domain: Domain, entry: StoredEntry) -> Result<(), StoreError> {
        let dir = self.domain_dir(domain);
        fs::create_dir_all(&dir).await?;

        let path = self.entry_path(domain, &entry.key);
        let json = serde_json::to_vec_pretty(&entry)?;
        let tmp = dir.join(format!(
            ".{}.{}.tmp",
            file_stem(&entry.key),
            TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&tmp, json).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn delete_all(&self, domain: Domain) -> Result<usize, StoreError> {
        let entries = self.scan(domain).await?;
        let mut removed = 0;
        for (path, _) in entries {
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }

    async fn purge_expired(&self, domain: Domain, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let entries = self.scan(domain).await?;
        let mut removed = 0;
        for (path, entry) in entries {
            if entry.is_fresh(now) {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(removed)
    }
}

/// Builds a file-name-safe, collision-free stem from a key
///
/// ASCII letters, digits and `-` are kept; every other byte becomes `_XX`
/// (upper-case hex). Components are joined with `.`, which is always escaped
/// inside a component.
fn file_stem(key: &CacheKey) -> String {
    key.parts()
        .iter()
        .map(|part| encode_component(part))
        .collect::<Vec<_>>()
        .join(".")
}

fn encode_component(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    for byte in part.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(byte as char);
        } else {
            out.push_str(&format!("_{:02X}", byte));
        }
    }
    out
}
