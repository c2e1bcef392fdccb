//! On-disk key-value cache for API responses
//!
//! Each `Namespace` is one JSON object on disk mapping a cache key to the raw
//! response body. A missing or corrupt file reads as an empty cache, and a
//! key is fetched from its source at most once for the lifetime of the file.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::Namespace;

/// In-memory contents of one namespace file
pub type CacheMap = BTreeMap<String, Value>;

/// Returns the cache key for a request: the explicit key when given, else the URL
pub fn resolve_key<'a>(url: &'a str, explicit: Option<&'a str>) -> &'a str {
    explicit.unwrap_or(url)
}

/// Reads and writes namespace files in a cache directory
///
/// Single-process use only: `fetch_or_get` reads, fetches, then rewrites the
/// whole file, with no locking in between.
#[derive(Debug, Clone)]
pub struct JsonCache {
    /// Directory where namespace files are stored
    cache_dir: PathBuf,
}

impl JsonCache {
    /// Creates a cache rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path of a namespace file
    pub fn path(&self, namespace: Namespace) -> PathBuf {
        self.cache_dir.join(namespace.file_name())
    }

    /// Loads a namespace
    ///
    /// A missing, unreadable or malformed file is a cold cache, not an error.
    pub fn open(&self, namespace: Namespace) -> CacheMap {
        let path = self.path(namespace);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(%namespace, error = %e, "Cache file unavailable, starting cold");
                return CacheMap::new();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            debug!(%namespace, error = %e, "Cache file is not a JSON object, starting cold");
            CacheMap::new()
        })
    }

    /// Writes the whole namespace, replacing the file
    pub fn save(&self, namespace: Namespace, map: &CacheMap) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)?;

        let json = serde_json::to_string(map)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.path(namespace), json)
    }

    /// Saves a namespace, logging instead of failing
    pub(crate) fn persist(&self, namespace: Namespace, map: &CacheMap) {
        if let Err(e) = self.save(namespace, map) {
            warn!(%namespace, error = %e, "Failed to write cache file");
        }
    }

    /// Returns the cached value for `cache_key`, calling `fetch` only on a miss
    ///
    /// On a miss the fetched value is stored under `cache_key`. The namespace
    /// file is rewritten after every successful call, hit or miss; a failed
    /// write is logged and does not fail the call.
    ///
    /// # Arguments
    /// * `namespace` - Which cache file the key lives in
    /// * `cache_key` - Slot for the value, usually from [`resolve_key`]
    /// * `fetch` - Produces the value on a miss; never called on a hit
    ///
    /// # Returns
    /// * `Ok(value)` from the cache or from `fetch`
    /// * `Err` from `fetch`, with nothing stored
    pub async fn fetch_or_get<F, Fut, E>(
        &self,
        namespace: Namespace,
        cache_key: &str,
        fetch: F,
    ) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let mut map = self.open(namespace);

        let value = match map.get(cache_key) {
            Some(value) => {
                debug!(%namespace, key = cache_key, "Cache hit");
                value.clone()
            }
            None => {
                debug!(%namespace, key = cache_key, "Cache miss, fetching");
                let value = fetch().await?;
                map.insert(cache_key.to_string(), value.clone());
                value
            }
        };

        self.persist(namespace, &map);
        Ok(value)
    }
}
