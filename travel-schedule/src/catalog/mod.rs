//! Catalog cache and city/station resolution.
//!
//! The provider's `stations_list` response is a large
//! country→region→settlement→station tree with optional codes at every
//! level. One snapshot is cached in memory ([`CatalogCache`]) and shared by
//! the resolvers, which turn free-text city/station names into canonical
//! codes by layered matching.

mod cache;
mod cities;
mod error;
mod stations;

pub use cache::{CatalogCache, CatalogSource};
pub use cities::{CityQuery, CityResolver, CountryMatcher};
pub use error::CatalogError;
pub use stations::{StationResolver, pick_station_code};
