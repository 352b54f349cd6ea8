//! Cached deals client: the single entry point views use to load the catalog.

use chrono::{DateTime, Duration, Utc};
use color_eyre::Result;
use std::future::Future;
use tracing::{error, info, warn};

use crate::cache::{CacheLayer, CacheSource, CacheStorage, MemoryStorage, NoopStorage, SqliteStorage};
use crate::config::Config;
use crate::db::Database;

use super::api_types::{DealItem, NewDeal};
use super::client::DealsClient;
use super::types::Deal;

/// Whether a load may be answered from the local snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
  #[default]
  CacheFirst,
  /// Always go to the network and overwrite the snapshot
  Refresh,
}

/// Where a loaded catalog came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
  Cache,
  Network,
  /// The load failed; the catalog is empty
  Failed,
}

impl From<CacheSource> for LoadSource {
  fn from(source: CacheSource) -> Self {
    match source {
      CacheSource::Cache => LoadSource::Cache,
      CacheSource::Network => LoadSource::Network,
    }
  }
}

/// Outcome of a catalog load. Never an error: failures surface as an empty
/// catalog with `LoadSource::Failed`.
#[derive(Debug, Clone)]
pub struct LoadedDeals {
  pub deals: Vec<Deal>,
  pub source: LoadSource,
  pub cached_at: Option<DateTime<Utc>>,
}

impl LoadedDeals {
  pub fn failed() -> Self {
    Self {
      deals: Vec::new(),
      source: LoadSource::Failed,
      cached_at: None,
    }
  }

  /// Snapshot age relative to `now`, for cache hits
  pub fn age(&self, now: DateTime<Utc>) -> Option<Duration> {
    self.cached_at.map(|at| (now - at).max(Duration::zero()))
  }
}

/// Deals client with transparent snapshot caching.
#[derive(Clone)]
pub struct CachedDealsClient {
  inner: DealsClient,
  cache: CacheLayer<Box<dyn CacheStorage>>,
}

impl CachedDealsClient {
  /// Create a client whose cache storage follows the config.
  ///
  /// An unusable cache database downgrades to a snapshot that lives only as
  /// long as the process.
  pub fn new(config: &Config) -> Result<Self> {
    let inner = DealsClient::new(config)?;

    let storage: Box<dyn CacheStorage> = if config.cache.enabled {
      match Database::open(config.cache.path.as_deref()) {
        Ok(db) => Box::new(SqliteStorage::new(db)),
        Err(e) => {
          warn!(error = %e, "cache database unavailable, caching in memory");
          Box::new(MemoryStorage::new())
        }
      }
    } else {
      Box::new(NoopStorage)
    };

    let cache = CacheLayer::new(storage, inner.deals_url().as_str()).with_ttl(config.cache_ttl());

    Ok(Self { inner, cache })
  }

  /// Load the full catalog.
  pub async fn load(&self, mode: LoadMode) -> LoadedDeals {
    let inner = self.inner.clone();
    load_deals(&self.cache, mode, Utc::now(), move || async move {
      inner.list_deals().await
    })
    .await
  }

  /// Store a new deal and drop the now outdated snapshot.
  pub async fn create_deal(&self, deal: &NewDeal) -> Result<DealItem> {
    let item = self.inner.create_deal(deal).await?;
    if let Err(e) = self.cache.clear::<Deal>() {
      warn!(error = %e, "failed to invalidate snapshot after write");
    }
    Ok(item)
  }

  pub fn clear_cache(&self) -> Result<()> {
    self.cache.clear::<Deal>()
  }
}

/// Cache-first load with every failure swallowed and logged.
pub async fn load_deals<S, F, Fut>(
  cache: &CacheLayer<S>,
  mode: LoadMode,
  now: DateTime<Utc>,
  fetch: F,
) -> LoadedDeals
where
  S: CacheStorage,
  F: FnOnce() -> Fut,
  Fut: Future<Output = Result<Vec<DealItem>>>,
{
  let fetch_parsed = move || async move { fetch().await.map(parse_items) };

  let result = match mode {
    LoadMode::CacheFirst => cache.fetch_list(now, fetch_parsed).await,
    LoadMode::Refresh => cache.refresh_list(now, fetch_parsed).await,
  };

  match result {
    Ok(result) => {
      info!(
        count = result.data.len(),
        source = ?result.source,
        "loaded deals"
      );
      LoadedDeals {
        deals: result.data,
        source: result.source.into(),
        cached_at: result.cached_at,
      }
    }
    Err(e) => {
      error!(error = %e, "failed to load deals");
      LoadedDeals::failed()
    }
  }
}

/// Parse raw items, skipping (and logging) those with a malformed id.
pub fn parse_items(items: Vec<DealItem>) -> Vec<Deal> {
  let total = items.len();
  let deals: Vec<Deal> = items
    .into_iter()
    .filter_map(|item| match item.into_deal() {
      Ok(deal) => Some(deal),
      Err(e) => {
        warn!(error = %e, "skipping malformed deal");
        None
      }
    })
    .collect();

  if deals.len() < total {
    warn!(skipped = total - deals.len(), total, "some deals were skipped");
  }
  deals
}

#[cfg(test)]
mod tests {
  use super::*;
  use color_eyre::eyre::eyre;

  fn item(id: &str) -> DealItem {
    serde_json::from_value(serde_json::json!({
      "id": id,
      "category": "Food",
      "closed_deal": true,
      "participants": ["Ana"],
      "amount_requested": 100000,
      "equity_offered": 10
    }))
    .unwrap()
  }

  fn cache() -> CacheLayer<MemoryStorage> {
    CacheLayer::new(MemoryStorage::new(), "https://api.example.com/dev/deals")
  }

  fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
  }

  #[test]
  fn test_parse_items_skips_malformed() {
    let deals = parse_items(vec![item("1#2#Acme"), item("broken"), item("3#1#Bolt")]);
    assert_eq!(deals.len(), 2);
    assert_eq!(deals[0].company, "Acme");
    assert_eq!(deals[1].season, 3);
  }

  #[tokio::test]
  async fn test_network_load_writes_snapshot() {
    let cache = cache();

    let loaded = load_deals(&cache, LoadMode::CacheFirst, t0(), || async {
      Ok(vec![item("1#2#Acme")])
    })
    .await;
    assert_eq!(loaded.source, LoadSource::Network);
    assert_eq!(loaded.deals.len(), 1);

    // Second load within the TTL never calls the fetcher
    let later = t0() + Duration::hours(2);
    let loaded = load_deals(&cache, LoadMode::CacheFirst, later, || async {
      Err(eyre!("network must not be used"))
    })
    .await;
    assert_eq!(loaded.source, LoadSource::Cache);
    assert_eq!(loaded.deals[0].company, "Acme");
    assert_eq!(loaded.cached_at, Some(t0()));
    assert_eq!(loaded.age(later), Some(Duration::hours(2)));
  }

  #[tokio::test]
  async fn test_failure_yields_empty_catalog() {
    let loaded = load_deals(&cache(), LoadMode::CacheFirst, t0(), || async {
      Err(eyre!("500 Internal Server Error"))
    })
    .await;
    assert_eq!(loaded.source, LoadSource::Failed);
    assert!(loaded.deals.is_empty());
  }

  #[tokio::test]
  async fn test_refresh_bypasses_snapshot() {
    let cache = cache();
    cache
      .write_snapshot(&parse_items(vec![item("1#1#Old")]), t0())
      .unwrap();

    let loaded = load_deals(&cache, LoadMode::Refresh, t0(), || async {
      Ok(vec![item("2#1#New")])
    })
    .await;
    assert_eq!(loaded.source, LoadSource::Network);
    assert_eq!(loaded.deals[0].company, "New");
  }
}
