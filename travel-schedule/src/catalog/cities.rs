//! City resolution over the cached catalog.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, warn};

use crate::domain::{City, synthetic_city_id};
use crate::normalize::normalize;
use crate::rasp::types::{CountryDto, SettlementDto};

use super::cache::{CatalogCache, CatalogSource};
use super::error::CatalogError;

/// Country-scoping predicate for city lists.
///
/// The upstream catalog is unreliable about country codes, so matching is
/// layered: a code allowlist first, then normalized-title root substrings.
/// Kept pluggable so a different market only needs another matcher, not
/// another resolver.
#[derive(Debug, Clone)]
pub struct CountryMatcher {
    codes: Vec<String>,
    title_roots: Vec<String>,
}

impl CountryMatcher {
    pub fn new(
        codes: impl IntoIterator<Item = impl Into<String>>,
        title_roots: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
            title_roots: title_roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Matcher for Russia, with the code candidates and title roots the
    /// provider has been observed to use.
    pub fn russia() -> Self {
        Self::new(["c146", "225", "ru", "RU"], ["росс", "ros", "rus"])
    }

    pub fn matches(&self, country: &CountryDto) -> bool {
        if let Some(code) = country
            .codes
            .as_ref()
            .and_then(|c| c.yandex_code.as_deref())
            && self.codes.iter().any(|c| c == code)
        {
            return true;
        }

        let title = normalize(country.title.as_deref().unwrap_or(""));
        self.title_roots.iter().any(|root| title.contains(root))
    }
}

/// Query for [`CityResolver::resolve_city`]: a provider code hint and/or a
/// free-text title.
#[derive(Debug, Clone, Default)]
pub struct CityQuery {
    pub id: Option<String>,
    pub title: Option<String>,
}

impl CityQuery {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
        }
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: None,
        }
    }
}

/// Maps free-text city names to canonical settlements in the catalog.
#[derive(Clone)]
pub struct CityResolver<S: CatalogSource> {
    cache: CatalogCache<S>,
    country: CountryMatcher,
}

impl<S: CatalogSource> CityResolver<S> {
    pub fn new(cache: CatalogCache<S>, country: CountryMatcher) -> Self {
        Self { cache, country }
    }

    /// Resolve a city query against the catalog.
    ///
    /// Tiers, first match wins (the ordering is load-bearing: provider codes
    /// are more trustworthy than titles, and exact titles more trustworthy
    /// than substrings):
    /// 1. `id` equals a settlement's catalog code
    /// 2. raw title equality, case-insensitive
    /// 3. raw title contains the query, case-insensitive
    /// 4. normalized titles equal (catches "ё" and diacritic variance)
    ///
    /// `None` means "not found", never an error.
    pub async fn resolve_city(&self, query: &CityQuery) -> Result<Option<City>, CatalogError> {
        let catalog = self.cache.get(false).await?;

        let settlements: Vec<(&CountryDto, &str, &SettlementDto)> = catalog
            .countries
            .iter()
            .flat_map(|country| {
                country.regions.iter().flat_map(move |region| {
                    region.settlements.iter().map(move |settlement| {
                        (country, region.title.as_deref().unwrap_or(""), settlement)
                    })
                })
            })
            .collect();

        if let Some(id) = query.id.as_deref().filter(|id| !id.is_empty())
            && let Some(found) = settlements
                .iter()
                .find(|(_, _, s)| settlement_code(s) == Some(id))
        {
            debug!(%id, "city resolved by code");
            return Ok(Some(build_city(found.0, found.1, found.2)));
        }

        let Some(title) = query.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
        else {
            return Ok(None);
        };

        let lowered = title.to_lowercase();

        if let Some(found) = settlements
            .iter()
            .find(|(_, _, s)| raw_title(s).to_lowercase() == lowered)
        {
            debug!(%title, "city resolved by exact title");
            return Ok(Some(build_city(found.0, found.1, found.2)));
        }

        if let Some(found) = settlements
            .iter()
            .find(|(_, _, s)| raw_title(s).to_lowercase().contains(&lowered))
        {
            debug!(%title, "city resolved by title substring");
            return Ok(Some(build_city(found.0, found.1, found.2)));
        }

        let normalized = normalize(title);
        if let Some(found) = settlements
            .iter()
            .find(|(_, _, s)| normalize(raw_title(s)) == normalized)
        {
            debug!(%title, "city resolved by normalized title");
            return Ok(Some(build_city(found.0, found.1, found.2)));
        }

        debug!(%title, "city not found");
        Ok(None)
    }

    /// Build the city list for the configured country.
    ///
    /// No matching country yields an empty list, not an error: the upstream
    /// is unreliable and the picker degrades to "nothing to choose from".
    /// Duplicate ids keep the first-seen settlement. The result is sorted by
    /// title, case-insensitively.
    pub async fn cities_of_country(&self) -> Result<Vec<City>, CatalogError> {
        let catalog = self.cache.get(false).await?;

        let Some(country) = catalog.countries.iter().find(|c| self.country.matches(c))
        else {
            warn!("configured country not found in catalog; returning empty city list");
            return Ok(Vec::new());
        };

        let mut seen = HashSet::new();
        let mut cities: Vec<City> = country
            .regions
            .iter()
            .flat_map(|region| {
                let region_title = region.title.as_deref().unwrap_or("");
                region
                    .settlements
                    .iter()
                    .filter(|s| !raw_title(s).is_empty())
                    .map(move |s| build_city(country, region_title, s))
            })
            .filter(|city| seen.insert(city.id.clone()))
            .collect();

        cities.sort_by(|a, b| normalize(&a.title).cmp(&normalize(&b.title)));

        debug!(count = cities.len(), "built country city list");
        Ok(cities)
    }
}

fn raw_title(settlement: &SettlementDto) -> &str {
    settlement.title.as_deref().unwrap_or("")
}

fn settlement_code(settlement: &SettlementDto) -> Option<&str> {
    settlement
        .codes
        .as_ref()
        .and_then(|c| c.yandex_code.as_deref())
}

/// Build a `City` from a settlement, tolerating a missing code by deriving a
/// synthetic id from the normalized country|region|settlement titles.
fn build_city(country: &CountryDto, region_title: &str, settlement: &SettlementDto) -> City {
    let title = raw_title(settlement).to_string();
    let id = settlement_code(settlement)
        .map(str::to_string)
        .unwrap_or_else(|| {
            synthetic_city_id(country.title.as_deref().unwrap_or(""), region_title, &title)
        });

    let first_station = settlement.stations.first();
    let transport_types: BTreeSet<String> = settlement
        .stations
        .iter()
        .filter_map(|s| s.transport_type.clone())
        .filter(|t| !t.is_empty())
        .collect();

    City {
        id,
        title,
        region: Some(region_title.to_string()).filter(|r| !r.is_empty()),
        country: country.title.clone(),
        lat: first_station.and_then(|s| s.lat),
        lon: first_station.and_then(|s| s.lng),
        transport_types,
    }
}
