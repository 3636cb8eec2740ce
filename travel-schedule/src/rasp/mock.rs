//! Mock schedule provider for testing without API access.
//!
//! Serves canned JSON through the same traits the real client implements,
//! with call counters so tests can assert how much I/O a code path costs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;

use crate::availability::SegmentSource;
use crate::catalog::{CatalogError, CatalogSource};
use crate::domain::Segment;

use super::convert::map_segments;
use super::error::RaspError;
use super::types::{AllStationsResponse, CarrierInfoResponse, SearchResponse};

#[derive(Default)]
struct MockState {
    catalog: Mutex<Option<serde_json::Value>>,
    searches: Mutex<HashMap<(String, String), serde_json::Value>>,
    carriers: Mutex<HashMap<String, serde_json::Value>>,
    fetch_delay: Mutex<Option<Duration>>,
    fail_catalog: AtomicBool,
    fail_search: AtomicBool,
    fail_carrier: AtomicBool,
    catalog_fetches: AtomicU64,
    search_calls: AtomicU64,
    carrier_calls: AtomicU64,
}

/// In-memory stand-in for the provider API.
#[derive(Clone, Default)]
pub struct MockRaspApi {
    state: Arc<MockState>,
}

impl MockRaspApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve this JSON value as the station catalog.
    pub fn with_catalog(self, json: serde_json::Value) -> Self {
        *self.state.catalog.lock().unwrap() = Some(json);
        self
    }

    /// Make every catalog fetch fail.
    pub fn failing_catalog(self) -> Self {
        self.state.fail_catalog.store(true, Ordering::SeqCst);
        self
    }

    /// Toggle catalog failure after construction.
    pub fn set_catalog_failure(&self, fail: bool) {
        self.state.fail_catalog.store(fail, Ordering::SeqCst);
    }

    /// Delay each catalog fetch, so tests can overlap concurrent callers.
    pub fn with_fetch_delay(self, delay: Duration) -> Self {
        *self.state.fetch_delay.lock().unwrap() = Some(delay);
        self
    }

    /// Serve this JSON search response for a (from, to) station-code pair.
    /// Unconfigured pairs get an empty segment list.
    pub fn with_search_json(
        self,
        from: impl Into<String>,
        to: impl Into<String>,
        json: serde_json::Value,
    ) -> Self {
        self.state
            .searches
            .lock()
            .unwrap()
            .insert((from.into(), to.into()), json);
        self
    }

    /// Make every search fail.
    pub fn failing_search(self) -> Self {
        self.state.fail_search.store(true, Ordering::SeqCst);
        self
    }

    /// Serve this JSON carrier-info response for a carrier code.
    pub fn with_carrier(self, code: impl Into<String>, json: serde_json::Value) -> Self {
        self.state
            .carriers
            .lock()
            .unwrap()
            .insert(code.into(), json);
        self
    }

    /// Make every carrier lookup fail.
    pub fn failing_carrier_lookup(self) -> Self {
        self.state.fail_carrier.store(true, Ordering::SeqCst);
        self
    }

    pub fn catalog_fetches(&self) -> u64 {
        self.state.catalog_fetches.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> u64 {
        self.state.search_calls.load(Ordering::SeqCst)
    }

    pub fn carrier_calls(&self) -> u64 {
        self.state.carrier_calls.load(Ordering::SeqCst)
    }
}

impl CatalogSource for MockRaspApi {
    async fn fetch_catalog(&self) -> Result<AllStationsResponse, CatalogError> {
        self.state.catalog_fetches.fetch_add(1, Ordering::SeqCst);

        // Take the delay out of the guard before awaiting.
        let delay = *self.state.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.state.fail_catalog.load(Ordering::SeqCst) {
            return Err(CatalogError::Fetch {
                message: "mock catalog failure".to_string(),
            });
        }

        let json = self
            .state
            .catalog
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CatalogError::Fetch {
                message: "no mock catalog configured".to_string(),
            })?;

        serde_json::from_value(json).map_err(|e| CatalogError::Fetch {
            message: format!("mock catalog did not decode: {e}"),
        })
    }
}

impl SegmentSource for MockRaspApi {
    async fn search(
        &self,
        from: &str,
        to: &str,
        _date: NaiveDate,
        _transport: Option<&str>,
    ) -> Result<Vec<Segment>, RaspError> {
        self.state.search_calls.fetch_add(1, Ordering::SeqCst);

        if self.state.fail_search.load(Ordering::SeqCst) {
            return Err(RaspError::Api {
                status: 500,
                message: "mock search failure".to_string(),
            });
        }

        let json = self
            .state
            .searches
            .lock()
            .unwrap()
            .get(&(from.to_string(), to.to_string()))
            .cloned();

        let Some(json) = json else {
            return Ok(Vec::new());
        };

        let response: SearchResponse =
            serde_json::from_value(json).map_err(|e| RaspError::Json {
                message: e.to_string(),
                body: None,
            })?;
        Ok(map_segments(&response))
    }

    async fn carrier_contacts(
        &self,
        code: &str,
    ) -> Result<Option<CarrierInfoResponse>, RaspError> {
        self.state.carrier_calls.fetch_add(1, Ordering::SeqCst);

        if self.state.fail_carrier.load(Ordering::SeqCst) {
            return Err(RaspError::Api {
                status: 500,
                message: "mock carrier failure".to_string(),
            });
        }

        let json = self.state.carriers.lock().unwrap().get(code).cloned();
        let Some(json) = json else {
            return Ok(None);
        };

        let info: CarrierInfoResponse =
            serde_json::from_value(json).map_err(|e| RaspError::Json {
                message: e.to_string(),
                body: None,
            })?;
        Ok(Some(info))
    }
}
