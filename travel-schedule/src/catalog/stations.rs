//! Station resolution within a city.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{City, Station};
use crate::normalize::normalize;
use crate::rasp::types::SettlementDto;

use super::cache::{CatalogCache, CatalogSource};
use super::cities::CountryMatcher;
use super::error::CatalogError;

/// Maps a city (code or free-text title) to its stations, and a free-text
/// station title to a station code.
///
/// Station lists are memoized by normalized city title for the lifetime of
/// one resolver instance; the orchestrator creates one resolver per search
/// session, so the memo never crosses sessions.
pub struct StationResolver<S: CatalogSource> {
    cache: CatalogCache<S>,
    country: CountryMatcher,
    memo: Mutex<HashMap<String, Vec<Station>>>,
}

impl<S: CatalogSource> StationResolver<S> {
    pub fn new(cache: CatalogCache<S>, country: CountryMatcher) -> Self {
        Self {
            cache,
            country,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Stations of a resolved city.
    pub async fn stations_of(&self, city: &City) -> Result<Vec<Station>, CatalogError> {
        self.stations_of_city(&city.id, Some(&city.title)).await
    }

    /// Stations of a city addressed by code and/or title.
    ///
    /// A code match wins; otherwise every settlement whose normalized title
    /// equals the query is aggregated (the provider sometimes splits one
    /// city across records), deduplicated by station id and sorted by title.
    pub async fn stations_of_city(
        &self,
        city_id: &str,
        city_title: Option<&str>,
    ) -> Result<Vec<Station>, CatalogError> {
        let catalog = self.cache.get(false).await?;

        let settlements: Vec<&SettlementDto> = catalog
            .countries
            .iter()
            .filter(|c| self.country.matches(c))
            .flat_map(|c| c.regions.iter())
            .flat_map(|r| r.settlements.iter())
            .collect();

        if !city_id.is_empty()
            && let Some(settlement) = settlements.iter().find(|s| {
                s.codes.as_ref().and_then(|c| c.yandex_code.as_deref()) == Some(city_id)
            })
        {
            let stations = map_stations(settlement, city_id);
            debug!(%city_id, count = stations.len(), "stations matched by city code");
            if !stations.is_empty() {
                return Ok(stations);
            }
        }

        let Some(title) = city_title.map(str::trim).filter(|t| !t.is_empty()) else {
            debug!(%city_id, "no stations for city");
            return Ok(Vec::new());
        };

        let wanted = normalize(title);
        let mut by_id: HashMap<String, Station> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for settlement in settlements
            .iter()
            .filter(|s| normalize(s.title.as_deref().unwrap_or("")) == wanted)
        {
            let fallback_id = settlement
                .codes
                .as_ref()
                .and_then(|c| c.yandex_code.as_deref())
                .unwrap_or(city_id);
            for station in map_stations(settlement, fallback_id) {
                if !by_id.contains_key(&station.id) {
                    order.push(station.id.clone());
                    by_id.insert(station.id.clone(), station);
                }
            }
        }

        let mut stations: Vec<Station> = order
            .into_iter()
            .filter_map(|id| by_id.remove(&id))
            .collect();
        stations.sort_by(|a, b| normalize(&a.title).cmp(&normalize(&b.title)));

        debug!(%title, count = stations.len(), "stations aggregated by city title");
        Ok(stations)
    }

    /// Memoized variant keyed by normalized city title, for repeat lookups
    /// within one session.
    pub async fn stations_for_city_title(
        &self,
        city_title: &str,
    ) -> Result<Vec<Station>, CatalogError> {
        let key = normalize(city_title);

        if let Some(cached) = self.memo.lock().await.get(&key) {
            debug!(city = %city_title, "stations served from session memo");
            return Ok(cached.clone());
        }

        let stations = self.stations_of_city("", Some(city_title)).await?;
        self.memo.lock().await.insert(key, stations.clone());
        Ok(stations)
    }

    /// Resolve a station title to its code within one session, consulting
    /// the memo.
    pub async fn resolve_station_code(
        &self,
        city_title: &str,
        station_title: &str,
    ) -> Result<Option<String>, CatalogError> {
        let stations = self.stations_for_city_title(city_title).await?;
        let code = pick_station_code(&stations, station_title);
        debug!(
            city = %city_title,
            station = %station_title,
            resolved = code.is_some(),
            "station code resolution"
        );
        Ok(code)
    }
}

/// Pick the best-matching station code for a free-text title.
///
/// Exact case/diacritic-insensitive equality wins; otherwise the first
/// station whose lowercase title contains the lowercase query.
pub fn pick_station_code(stations: &[Station], station_title: &str) -> Option<String> {
    if let Some(exact) = stations
        .iter()
        .find(|s| normalize(&s.title) == normalize(station_title))
    {
        return Some(exact.id.clone());
    }

    let target = station_title.to_lowercase();
    stations
        .iter()
        .find(|s| s.title.to_lowercase().contains(&target))
        .map(|s| s.id.clone())
}

/// Map a settlement's raw stations, dropping entries without a code (they
/// cannot be addressed in a search) and sorting by title.
fn map_stations(settlement: &SettlementDto, city_id: &str) -> Vec<Station> {
    let mut stations: Vec<Station> = settlement
        .stations
        .iter()
        .filter_map(|raw| {
            let id = raw.codes.as_ref()?.yandex_code.clone()?;
            let title = raw.title.clone()?;
            Some(Station {
                id,
                title,
                transport_type: raw.transport_type.clone(),
                station_type: raw.station_type.clone(),
                lat: raw.lat,
                lon: raw.lng,
                city_id: city_id.to_string(),
            })
        })
        .collect();

    stations.sort_by(|a, b| normalize(&a.title).cmp(&normalize(&b.title)));
    stations
}
