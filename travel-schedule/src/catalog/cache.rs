//! In-memory catalog snapshot cache with single-flight fetch coordination.
//!
//! The catalog is one large tree fetched in a single request. The cache
//! holds exactly one immutable snapshot behind an `Arc`; readers never see a
//! partially-updated tree because a fetch replaces the whole snapshot at
//! once. Concurrent `get` calls while no snapshot exists share one in-flight
//! fetch (a mutex-guarded shared-future memo).

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::rasp::types::AllStationsResponse;

use super::error::CatalogError;

/// Source of catalog data, abstracted so the cache can be exercised against
/// an in-memory provider in tests.
pub trait CatalogSource: Clone + Send + Sync + 'static {
    fn fetch_catalog(&self)
    -> impl Future<Output = Result<AllStationsResponse, CatalogError>> + Send;
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<AllStationsResponse>, CatalogError>>>;

/// Snapshot cache over a [`CatalogSource`].
///
/// Cheap to clone; clones share the snapshot and in-flight state.
#[derive(Clone)]
pub struct CatalogCache<S: CatalogSource> {
    source: S,
    snapshot: Arc<RwLock<Option<Arc<AllStationsResponse>>>>,
    inflight: Arc<Mutex<Option<SharedFetch>>>,
    /// Bumped by `invalidate`; a fetch only publishes its snapshot if the
    /// generation it started under is still current.
    generation: Arc<AtomicU64>,
}

impl<S: CatalogSource> CatalogCache<S> {
    /// Create an empty cache over the given source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            snapshot: Arc::new(RwLock::new(None)),
            inflight: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Return the cached snapshot, fetching it first if absent or if
    /// `force_reload` is set.
    ///
    /// All callers that arrive during one in-flight fetch await that same
    /// fetch and receive its result, even if `invalidate` ran in the
    /// meantime. A failed fetch never replaces a previous good snapshot.
    pub async fn get(
        &self,
        force_reload: bool,
    ) -> Result<Arc<AllStationsResponse>, CatalogError> {
        if !force_reload
            && let Some(snapshot) = self.snapshot.read().await.clone()
        {
            return Ok(snapshot);
        }

        let fetch = {
            let mut inflight = self.inflight.lock().await;
            match inflight.as_ref() {
                Some(fetch) => fetch.clone(),
                None => {
                    let fetch = self.spawn_fetch();
                    *inflight = Some(fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Discard the cached snapshot; the next `get` re-fetches.
    ///
    /// An in-flight fetch still delivers its result to everyone awaiting it,
    /// but will not publish that (now stale) snapshot.
    pub async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.snapshot.write().await = None;
        debug!("catalog snapshot invalidated");
    }

    /// Whether a snapshot is currently cached.
    pub async fn is_cached(&self) -> bool {
        self.snapshot.read().await.is_some()
    }

    fn spawn_fetch(&self) -> SharedFetch {
        let source = self.source.clone();
        let snapshot = Arc::clone(&self.snapshot);
        let inflight = Arc::clone(&self.inflight);
        let generation = Arc::clone(&self.generation);
        let started_at = generation.load(Ordering::SeqCst);

        async move {
            let result = source.fetch_catalog().await.map(Arc::new);

            // Free the slot before publishing so a follow-up get can start a
            // fresh fetch immediately.
            inflight.lock().await.take();

            match &result {
                Ok(catalog) => {
                    if generation.load(Ordering::SeqCst) == started_at {
                        *snapshot.write().await = Some(Arc::clone(catalog));
                    } else {
                        debug!("catalog fetch superseded by invalidate; not publishing");
                    }
                }
                Err(e) => warn!(error = %e, "catalog fetch failed"),
            }

            result
        }
        .boxed()
        .shared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasp::mock::MockRaspApi;

    fn catalog_json() -> serde_json::Value {
        serde_json::json!({
            "countries": [{
                "title": "Россия",
                "codes": {"yandex_code": "c146"},
                "regions": []
            }]
        })
    }

    #[tokio::test]
    async fn get_fetches_once_and_caches() {
        let api = MockRaspApi::new().with_catalog(catalog_json());
        let cache = CatalogCache::new(api.clone());

        let first = cache.get(false).await.unwrap();
        let second = cache.get(false).await.unwrap();

        assert_eq!(api.catalog_fetches(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn concurrent_gets_share_one_fetch() {
        let api = MockRaspApi::new()
            .with_catalog(catalog_json())
            .with_fetch_delay(std::time::Duration::from_millis(20));
        let cache = CatalogCache::new(api.clone());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.get(false).await })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }

        assert_eq!(api.catalog_fetches(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let api = MockRaspApi::new().with_catalog(catalog_json());
        let cache = CatalogCache::new(api.clone());

        cache.get(false).await.unwrap();
        cache.invalidate().await;
        assert!(!cache.is_cached().await);

        cache.get(false).await.unwrap();
        assert_eq!(api.catalog_fetches(), 2);
    }

    #[tokio::test]
    async fn invalidate_during_inflight_fetch_delivers_without_publishing() {
        let api = MockRaspApi::new()
            .with_catalog(catalog_json())
            .with_fetch_delay(std::time::Duration::from_millis(50));
        let cache = CatalogCache::new(api.clone());

        let awaiter = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.get(false).await })
        };

        // Let the fetch start, then invalidate under it.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        cache.invalidate().await;

        // The awaiter still receives the fetched catalog.
        assert!(awaiter.await.unwrap().is_ok());

        // But the superseded fetch did not publish; the next get refetches.
        assert!(!cache.is_cached().await);
        cache.get(false).await.unwrap();
        assert_eq!(api.catalog_fetches(), 2);
    }

    #[tokio::test]
    async fn force_reload_refetches() {
        let api = MockRaspApi::new().with_catalog(catalog_json());
        let cache = CatalogCache::new(api.clone());

        cache.get(false).await.unwrap();
        cache.get(true).await.unwrap();

        assert_eq!(api.catalog_fetches(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_surfaces_error_and_caches_nothing() {
        let api = MockRaspApi::new().failing_catalog();
        let cache = CatalogCache::new(api.clone());

        assert!(cache.get(false).await.is_err());
        assert!(!cache.is_cached().await);

        // Next get retries instead of serving the failure.
        assert!(cache.get(false).await.is_err());
        assert_eq!(api.catalog_fetches(), 2);
    }

    #[tokio::test]
    async fn failed_forced_reload_keeps_previous_snapshot() {
        let api = MockRaspApi::new().with_catalog(catalog_json());
        let cache = CatalogCache::new(api.clone());

        let good = cache.get(false).await.unwrap();

        api.set_catalog_failure(true);
        assert!(cache.get(true).await.is_err());

        // The earlier snapshot is still served.
        let kept = cache.get(false).await.unwrap();
        assert!(Arc::ptr_eq(&good, &kept));
    }
}
