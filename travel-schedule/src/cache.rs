//! Caching layer for schedule searches.
//!
//! Search results are stable over short windows and the same route is often
//! queried repeatedly while the user flips filters. A short-TTL cache in
//! front of the search endpoint absorbs those repeats without risking stale
//! availability.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;

use crate::availability::SegmentSource;
use crate::domain::Segment;
use crate::rasp::RaspError;
use crate::rasp::types::CarrierInfoResponse;

/// Cache key: (from code, to code, date, transport filter).
type SearchKey = (String, String, NaiveDate, Option<String>);

type SearchEntry = Arc<Vec<Segment>>;

/// Configuration for the search cache.
#[derive(Debug, Clone)]
pub struct SearchCacheConfig {
    /// TTL for cached search results.
    pub ttl: Duration,

    /// Maximum number of cached routes.
    pub max_capacity: u64,
}

impl Default for SearchCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// A [`SegmentSource`] that caches search results in front of another.
///
/// Carrier lookups pass straight through; they are rare and already cheap.
#[derive(Clone)]
pub struct CachedSearchClient<S> {
    inner: S,
    searches: MokaCache<SearchKey, SearchEntry>,
}

impl<S: SegmentSource> CachedSearchClient<S> {
    pub fn new(inner: S, config: &SearchCacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, searches }
    }

    /// Access the underlying source for operations that bypass the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn entry_count(&self) -> u64 {
        self.searches.entry_count()
    }

    pub fn invalidate_all(&self) {
        self.searches.invalidate_all();
    }
}

impl<S: SegmentSource> SegmentSource for CachedSearchClient<S> {
    async fn search(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
        transport: Option<&str>,
    ) -> Result<Vec<Segment>, RaspError> {
        let key: SearchKey = (
            from.to_string(),
            to.to_string(),
            date,
            transport.map(str::to_string),
        );

        if let Some(cached) = self.searches.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let segments = self.inner.search(from, to, date, transport).await?;
        self.searches
            .insert(key, Arc::new(segments.clone()))
            .await;

        Ok(segments)
    }

    async fn carrier_contacts(
        &self,
        code: &str,
    ) -> Result<Option<CarrierInfoResponse>, RaspError> {
        self.inner.carrier_contacts(code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasp::mock::MockRaspApi;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn search_json() -> serde_json::Value {
        serde_json::json!({
            "segments": [{
                "departure": "2024-03-01T06:15:00+03:00",
                "arrival": "2024-03-01T12:05:00+03:00",
                "thread": {"carrier": {"title": "RZD"}}
            }]
        })
    }

    #[tokio::test]
    async fn repeated_search_hits_the_cache() {
        let api = MockRaspApi::new().with_search_json("s1", "s2", search_json());
        let cached = CachedSearchClient::new(api.clone(), &SearchCacheConfig::default());

        let first = cached.search("s1", "s2", date(), None).await.unwrap();
        let second = cached.search("s1", "s2", date(), None).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(api.search_calls(), 1);
    }

    #[tokio::test]
    async fn different_route_misses_the_cache() {
        let api = MockRaspApi::new().with_search_json("s1", "s2", search_json());
        let cached = CachedSearchClient::new(api.clone(), &SearchCacheConfig::default());

        cached.search("s1", "s2", date(), None).await.unwrap();
        cached.search("s2", "s1", date(), None).await.unwrap();

        assert_eq!(api.search_calls(), 2);
    }

    #[tokio::test]
    async fn transport_filter_is_part_of_the_key() {
        let api = MockRaspApi::new().with_search_json("s1", "s2", search_json());
        let cached = CachedSearchClient::new(api.clone(), &SearchCacheConfig::default());

        cached.search("s1", "s2", date(), None).await.unwrap();
        cached.search("s1", "s2", date(), Some("train")).await.unwrap();

        assert_eq!(api.search_calls(), 2);
    }

    #[tokio::test]
    async fn failed_search_is_not_cached() {
        let api = MockRaspApi::new().failing_search();
        let cached = CachedSearchClient::new(api.clone(), &SearchCacheConfig::default());

        assert!(cached.search("s1", "s2", date(), None).await.is_err());
        assert!(cached.search("s1", "s2", date(), None).await.is_err());

        assert_eq!(api.search_calls(), 2);
        assert_eq!(cached.entry_count(), 0);
    }

    #[test]
    fn default_config() {
        let config = SearchCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.max_capacity, 1000);
    }
}
