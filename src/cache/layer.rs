//! Cache layer that keeps one timestamped snapshot per source and decides when
//! to go back to the network.

use chrono::{DateTime, Duration, Utc};
use color_eyre::{eyre::eyre, Result};
use sha2::{Digest, Sha256};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::CacheStorage;
use super::traits::{CacheResult, Cacheable, Snapshot};

/// Cache layer that manages snapshot validity and network fetching.
///
/// A snapshot is two storage entries: the JSON-serialized entities and the
/// write time in epoch milliseconds. Both are namespaced by a digest of the
/// source they were fetched from.
pub struct CacheLayer<S: CacheStorage> {
  storage: Arc<S>,
  scope: String,
  /// How long a snapshot stays usable
  ttl: Duration,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer for data fetched from `source`.
  pub fn new(storage: S, source: &str) -> Self {
    Self {
      storage: Arc::new(storage),
      scope: scope_for(source),
      ttl: Duration::hours(24),
    }
  }

  /// Set how long snapshots stay usable.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// A snapshot is usable strictly before it reaches the TTL.
  pub fn is_fresh(&self, written_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - written_at < self.ttl
  }

  fn data_key<T: Cacheable>(&self) -> String {
    format!("{}_data_cache:{}", T::entity_type(), self.scope)
  }

  fn time_key<T: Cacheable>(&self) -> String {
    format!("{}_data_cache_time:{}", T::entity_type(), self.scope)
  }

  /// Read the snapshot if one exists and is still fresh at `now`.
  ///
  /// Unreadable entries count as a miss; only storage failures are errors.
  pub fn read_snapshot<T: Cacheable>(&self, now: DateTime<Utc>) -> Result<Option<Snapshot<T>>> {
    let data_key = self.data_key::<T>();
    let time_key = self.time_key::<T>();

    let (Some(data), Some(time)) = (self.storage.get(&data_key)?, self.storage.get(&time_key)?)
    else {
      return Ok(None);
    };

    let Some(written_at) = time
      .trim()
      .parse::<i64>()
      .ok()
      .and_then(DateTime::from_timestamp_millis)
    else {
      warn!(key = %time_key, value = %time, "ignoring unreadable cache timestamp");
      return Ok(None);
    };

    if !self.is_fresh(written_at, now) {
      debug!(key = %data_key, %written_at, "cached snapshot expired");
      return Ok(None);
    }

    let entities: Vec<T> = match serde_json::from_str(&data) {
      Ok(entities) => entities,
      Err(e) => {
        warn!(key = %data_key, error = %e, "ignoring unreadable cached snapshot");
        return Ok(None);
      }
    };

    Ok(Some(Snapshot {
      entities,
      written_at,
      age: (now - written_at).max(Duration::zero()),
    }))
  }

  /// Replace the snapshot with `entities`, stamped with `written_at`.
  pub fn write_snapshot<T: Cacheable>(&self, entities: &[T], written_at: DateTime<Utc>) -> Result<()> {
    let data =
      serde_json::to_string(entities).map_err(|e| eyre!("Failed to serialize snapshot: {}", e))?;
    let time = written_at.timestamp_millis().to_string();

    self.storage.set_many(&[
      (self.data_key::<T>().as_str(), data.as_str()),
      (self.time_key::<T>().as_str(), time.as_str()),
    ])
  }

  /// Drop the snapshot for `T`.
  pub fn clear<T: Cacheable>(&self) -> Result<()> {
    self.storage.remove(&self.data_key::<T>())?;
    self.storage.remove(&self.time_key::<T>())
  }

  /// Fetch a list with cache-first strategy.
  ///
  /// 1. Fresh snapshot - return it, no network call
  /// 2. Missing or expired - fetch from network and write a new snapshot
  ///
  /// There is no stale fallback: a network failure is returned as an error.
  /// Cache read and write failures are logged and otherwise ignored.
  pub async fn fetch_list<T, F, Fut>(
    &self,
    now: DateTime<Utc>,
    fetcher: F,
  ) -> Result<CacheResult<Vec<T>>>
  where
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    match self.read_snapshot::<T>(now) {
      Ok(Some(snapshot)) => {
        debug!(
          entity = T::entity_type(),
          count = snapshot.entities.len(),
          age_secs = snapshot.age.num_seconds(),
          "serving cached snapshot"
        );
        return Ok(CacheResult::from_cache(
          snapshot.entities,
          snapshot.written_at,
        ));
      }
      Ok(None) => {}
      Err(e) => warn!(error = %e, "cache read failed, fetching from network"),
    }

    self.refresh_list(now, fetcher).await
  }

  /// Skip the snapshot, fetch from network and overwrite it.
  pub async fn refresh_list<T, F, Fut>(
    &self,
    now: DateTime<Utc>,
    fetcher: F,
  ) -> Result<CacheResult<Vec<T>>>
  where
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    let data = fetcher().await?;

    if let Err(e) = self.write_snapshot(&data, now) {
      warn!(error = %e, "failed to write snapshot");
    }

    Ok(CacheResult::from_network(data))
  }
}

impl<S: CacheStorage> Clone for CacheLayer<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      scope: self.scope.clone(),
      ttl: self.ttl,
    }
  }
}

/// Stable short namespace for a data source.
fn scope_for(source: &str) -> String {
  // SHA256 hash for stable, fixed-length keys
  let mut hasher = Sha256::new();
  hasher.update(source.trim().as_bytes());
  let digest = hex::encode(hasher.finalize());
  digest[..16].to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::storage::MemoryStorage;
  use crate::cache::traits::CacheSource;
  use serde::{Deserialize, Serialize};
  use std::sync::atomic::{AtomicU32, Ordering};

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Item(u32);

  impl Cacheable for Item {
    fn entity_type() -> &'static str {
      "item"
    }
  }

  fn layer() -> CacheLayer<MemoryStorage> {
    CacheLayer::new(MemoryStorage::new(), "https://api.example.com/dev/deals")
  }

  fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
  }

  #[test]
  fn test_snapshot_usable_just_before_ttl() {
    let cache = layer();
    cache.write_snapshot(&[Item(1), Item(2)], t0()).unwrap();

    let at = t0() + Duration::hours(23) + Duration::minutes(59);
    let snapshot = cache.read_snapshot::<Item>(at).unwrap().unwrap();
    assert_eq!(snapshot.entities, vec![Item(1), Item(2)]);
    assert_eq!(snapshot.written_at, t0());
    assert_eq!(snapshot.age, Duration::hours(23) + Duration::minutes(59));
  }

  #[test]
  fn test_snapshot_unusable_after_ttl() {
    let cache = layer();
    cache.write_snapshot(&[Item(1)], t0()).unwrap();

    let at = t0() + Duration::hours(24) + Duration::minutes(1);
    assert!(cache.read_snapshot::<Item>(at).unwrap().is_none());

    // Exactly at the TTL is already expired
    assert!(cache
      .read_snapshot::<Item>(t0() + Duration::hours(24))
      .unwrap()
      .is_none());
  }

  #[test]
  fn test_custom_ttl() {
    let cache = layer().with_ttl(Duration::minutes(5));
    cache.write_snapshot(&[Item(1)], t0()).unwrap();
    assert!(cache
      .read_snapshot::<Item>(t0() + Duration::minutes(6))
      .unwrap()
      .is_none());
  }

  #[test]
  fn test_corrupt_entries_read_as_absent() {
    let storage = MemoryStorage::new();
    let cache = CacheLayer::new(storage, "src");
    cache.write_snapshot(&[Item(1)], t0()).unwrap();

    cache
      .storage
      .set(&cache.data_key::<Item>(), "{not json")
      .unwrap();
    assert!(cache.read_snapshot::<Item>(t0()).unwrap().is_none());

    cache.write_snapshot(&[Item(1)], t0()).unwrap();
    cache
      .storage
      .set(&cache.time_key::<Item>(), "yesterday")
      .unwrap();
    assert!(cache.read_snapshot::<Item>(t0()).unwrap().is_none());
  }

  #[test]
  fn test_sources_do_not_share_snapshots() {
    let storage = Arc::new(MemoryStorage::new());
    let a = CacheLayer {
      storage: Arc::clone(&storage),
      scope: scope_for("https://a.example.com"),
      ttl: Duration::hours(24),
    };
    let b = CacheLayer {
      storage,
      scope: scope_for("https://b.example.com"),
      ttl: Duration::hours(24),
    };

    a.write_snapshot(&[Item(1)], t0()).unwrap();
    assert!(b.read_snapshot::<Item>(t0()).unwrap().is_none());
  }

  #[test]
  fn test_clear_removes_snapshot() {
    let cache = layer();
    cache.write_snapshot(&[Item(1)], t0()).unwrap();
    cache.clear::<Item>().unwrap();
    assert!(cache.read_snapshot::<Item>(t0()).unwrap().is_none());
  }

  #[tokio::test]
  async fn test_fetch_list_uses_fresh_cache() {
    let cache = layer();
    cache.write_snapshot(&[Item(7)], t0()).unwrap();

    let calls = AtomicU32::new(0);
    let result = cache
      .fetch_list(t0() + Duration::hours(1), || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Item(99)])
      })
      .await
      .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(result.source, CacheSource::Cache);
    assert_eq!(result.data, vec![Item(7)]);
    assert_eq!(result.cached_at, Some(t0()));
  }

  #[tokio::test]
  async fn test_fetch_list_refetches_expired_and_rewrites() {
    let cache = layer();
    cache.write_snapshot(&[Item(7)], t0()).unwrap();

    let later = t0() + Duration::hours(25);
    let result = cache
      .fetch_list(later, || async { Ok(vec![Item(8), Item(9)]) })
      .await
      .unwrap();

    assert_eq!(result.source, CacheSource::Network);
    assert_eq!(result.data, vec![Item(8), Item(9)]);

    let snapshot = cache.read_snapshot::<Item>(later).unwrap().unwrap();
    assert_eq!(snapshot.written_at, later);
    assert_eq!(snapshot.entities, vec![Item(8), Item(9)]);
  }

  #[tokio::test]
  async fn test_fetch_list_network_error_has_no_stale_fallback() {
    let cache = layer();
    cache.write_snapshot(&[Item(7)], t0()).unwrap();

    let result = cache
      .fetch_list::<Item, _, _>(t0() + Duration::hours(30), || async {
        Err(eyre!("connection refused"))
      })
      .await;

    assert!(result.is_err());
  }

  #[tokio::test]
  async fn test_refresh_list_ignores_fresh_snapshot() {
    let cache = layer();
    cache.write_snapshot(&[Item(7)], t0()).unwrap();

    let result = cache
      .refresh_list(t0(), || async { Ok(vec![Item(1)]) })
      .await
      .unwrap();
    assert_eq!(result.source, CacheSource::Network);
    assert_eq!(result.data, vec![Item(1)]);
  }
}
