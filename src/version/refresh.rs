//! Cache-or-fetch orchestration shared by every source
//!
//! Upstream and cache failures never reach the caller: they are logged and
//! answered with the cached list, or an empty one.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::config::CACHE_TTL;
use crate::version::cache::CacheStore;
use crate::version::error::{CacheError, SourceError};
use crate::version::source::VersionSource;

/// Where the items returned by [`get_or_refresh`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from a live cache entry, no upstream call
    Hit,
    /// Fetched from the upstream just now
    Fetched,
    /// Refresh failed; served whatever the cache still had, possibly nothing
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Refreshed<T> {
    pub items: Vec<T>,
    pub outcome: CacheOutcome,
}

/// Failure of one refresh step, reported before falling back
#[derive(Debug, thiserror::Error)]
enum RefreshError {
    #[error("cache read failed: {0}")]
    CacheRead(CacheError),
    #[error("upstream fetch failed: {0}")]
    Fetch(#[from] SourceError),
}

/// Reads and decodes the entry for `key`. An entry that no longer decodes
/// (e.g. written by an older record layout) reads as a miss so the next
/// store replaces it.
fn read_cached<T, C>(cache: &C, key: &str) -> Result<Option<Vec<T>>, CacheError>
where
    T: DeserializeOwned,
    C: CacheStore + ?Sized,
{
    let Some(raw) = cache.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(items) => Ok(Some(items)),
        Err(e) => {
            warn!("Ignoring undecodable cache entry for {}: {}", key, e);
            Ok(None)
        }
    }
}

fn store<T, C>(cache: &C, key: &str, items: &[T]) -> Result<(), CacheError>
where
    T: Serialize,
    C: CacheStore + ?Sized,
{
    let raw = serde_json::to_string(items)?;
    cache.set_with_expiry(key, &raw, CACHE_TTL)
}

/// Best-effort re-read after a failed refresh
fn fallback<T, C>(cache: &C, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    C: CacheStore + ?Sized,
{
    read_cached(cache, key)
        .inspect_err(|e| error!("Fallback read of {} failed: {}", key, e))
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Returns the cached list for `source`, refreshing it from the upstream on a miss.
///
/// - A live cache entry is returned without contacting the upstream.
/// - An entry that fails to decode counts as a miss.
/// - A successful fetch is cached for [`CACHE_TTL`] unless it is empty.
/// - Any failure falls back to the cached value or an empty list.
pub async fn get_or_refresh<C, S>(cache: &C, source: &S) -> Refreshed<S::Item>
where
    C: CacheStore + ?Sized,
    S: VersionSource + ?Sized,
{
    let key = source.kind().cache_key();

    let result = match read_cached(cache, key) {
        Ok(Some(items)) => {
            debug!("Cache hit for {}", key);
            return Refreshed {
                items,
                outcome: CacheOutcome::Hit,
            };
        }
        Ok(None) => source.fetch().await.map_err(RefreshError::from),
        Err(e) => Err(RefreshError::CacheRead(e)),
    };

    match result {
        Ok(items) => {
            if items.is_empty() {
                warn!("{} returned no versions; not caching", key);
            } else if let Err(e) = store(cache, key, &items) {
                error!("Failed to cache {}: {}", key, e);
            } else {
                info!("Cached {} versions for {}", items.len(), key);
            }
            Refreshed {
                items,
                outcome: CacheOutcome::Fetched,
            }
        }
        Err(e) => {
            error!("Refreshing {} failed: {}", key, e);
            Refreshed {
                items: fallback(cache, key),
                outcome: CacheOutcome::Fallback,
            }
        }
    }
}
