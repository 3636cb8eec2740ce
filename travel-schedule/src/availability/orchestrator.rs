//! Availability check orchestration.
//!
//! Coordinates station-code resolution for both route endpoints (in
//! parallel) and the between-stations search, collapsing every failure mode
//! into a tri-state result. Errors never propagate out of
//! [`AvailabilityChecker::check_availability`]; the last underlying error is
//! kept alongside the state so a caller can distinguish "no route exists"
//! from "the provider was unreachable".

use std::collections::HashMap;
use std::future::Future;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::catalog::{CatalogCache, CatalogError, CatalogSource, CountryMatcher, StationResolver};
use crate::domain::{CarrierOption, Segment};
use crate::rasp::RaspError;
use crate::rasp::convert::normalize_logo_url;
use crate::rasp::types::CarrierInfoResponse;

use super::options::option_from_segment;

/// Source of schedule search results and carrier details, abstracted for
/// testing with call-count assertions.
pub trait SegmentSource: Send + Sync {
    fn search(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
        transport: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Segment>, RaspError>> + Send;

    fn carrier_contacts(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Option<CarrierInfoResponse>, RaspError>> + Send;
}

/// Observable state of one availability check.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AvailabilityState {
    /// Initial, or a check is in flight.
    #[default]
    Unknown,
    /// No transport between the endpoints (or the route could not be
    /// determined; see `last_error`).
    Unavailable,
    /// Transport exists; options are presentation-ready.
    Available(Vec<CarrierOption>),
}

/// The underlying cause of an `Unavailable` state, when there was one.
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("search failed: {0}")]
    Search(#[from] RaspError),
}

/// One availability-check session.
///
/// Create one checker per search screen visit: the station resolver's
/// per-city memo lives exactly as long as the checker.
pub struct AvailabilityChecker<C: CatalogSource, S: SegmentSource> {
    stations: StationResolver<C>,
    search: S,
    state: AvailabilityState,
    last_error: Option<AvailabilityError>,
}

impl<C: CatalogSource, S: SegmentSource> AvailabilityChecker<C, S> {
    pub fn new(catalog: CatalogCache<C>, country: CountryMatcher, search: S) -> Self {
        Self {
            stations: StationResolver::new(catalog, country),
            search,
            state: AvailabilityState::Unknown,
            last_error: None,
        }
    }

    pub fn state(&self) -> &AvailabilityState {
        &self.state
    }

    /// The carrier options of the last successful check; empty otherwise.
    pub fn options(&self) -> &[CarrierOption] {
        match &self.state {
            AvailabilityState::Available(options) => options,
            _ => &[],
        }
    }

    /// The error behind the current `Unavailable` state, if the cause was a
    /// failure rather than a clean miss.
    pub fn last_error(&self) -> Option<&AvailabilityError> {
        self.last_error.as_ref()
    }

    /// Check whether any transport runs between two (city, station) pairs on
    /// a date. Mutates the observable state; never fails.
    pub async fn check_availability(
        &mut self,
        from_city: &str,
        from_station: &str,
        to_city: &str,
        to_station: &str,
        date: NaiveDate,
    ) {
        self.state = AvailabilityState::Unknown;
        self.last_error = None;

        let from_city = from_city.trim();
        let from_station = from_station.trim();
        let to_city = to_city.trim();
        let to_station = to_station.trim();

        // A route to oneself is definitionally not a route; skip all I/O.
        if crate::normalize::titles_equal(from_city, to_city)
            || crate::normalize::titles_equal(from_station, to_station)
        {
            debug!("self-route guard tripped");
            self.state = AvailabilityState::Unavailable;
            return;
        }

        // The two resolutions are independent; run them concurrently and
        // join before searching.
        let (from_code, to_code) = tokio::join!(
            self.stations.resolve_station_code(from_city, from_station),
            self.stations.resolve_station_code(to_city, to_station),
        );

        let (from_code, to_code) = match (from_code, to_code) {
            (Ok(f), Ok(t)) => (f, t),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "station resolution failed");
                self.last_error = Some(e.into());
                self.state = AvailabilityState::Unavailable;
                return;
            }
        };

        let (Some(from_code), Some(to_code)) = (from_code, to_code) else {
            debug!("station codes not resolved; route unavailable");
            self.state = AvailabilityState::Unavailable;
            return;
        };

        let segments = match self.search.search(&from_code, &to_code, date, None).await {
            Ok(segments) => segments,
            Err(e) => {
                warn!(error = %e, "schedule search failed");
                self.last_error = Some(e.into());
                self.state = AvailabilityState::Unavailable;
                return;
            }
        };

        if segments.is_empty() {
            self.state = AvailabilityState::Unavailable;
            return;
        }

        let mut options: Vec<CarrierOption> =
            segments.iter().map(option_from_segment).collect();
        self.backfill_contacts(&mut options).await;

        debug!(count = options.len(), "availability check succeeded");
        self.state = AvailabilityState::Available(options);
    }

    /// Fill in contact details the mapping pass lacked, via the carrier-info
    /// endpoint. Lookup results are memoized per code, so options sharing a
    /// carrier cost one request. Lookup failures are logged and ignored;
    /// they never affect the availability state.
    async fn backfill_contacts(&self, options: &mut [CarrierOption]) {
        let mut contacts: HashMap<String, Option<CarrierInfoResponse>> = HashMap::new();

        for option in options.iter_mut() {
            if option.email.is_some() || option.phone.is_some() {
                continue;
            }
            let Some(code) = option.carrier_code.as_deref() else {
                continue;
            };

            if !contacts.contains_key(code) {
                let fetched = match self.search.carrier_contacts(code).await {
                    Ok(info) => info,
                    Err(e) => {
                        debug!(%code, error = %e, "carrier back-fill failed; skipping");
                        None
                    }
                };
                contacts.insert(code.to_string(), fetched);
            }

            let Some(info) = contacts.get(code).cloned().flatten() else {
                continue;
            };
            option.email = info.email;
            option.phone = info.phone;
            if option.logo_url.is_none() {
                option.logo_url = info.logo.as_deref().and_then(normalize_logo_url);
            }
        }
    }
}
