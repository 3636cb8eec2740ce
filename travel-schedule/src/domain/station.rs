//! Station entity.

use serde::{Deserialize, Serialize};

/// A station within a city, with its provider code as `id`.
///
/// Stations without a provider code are dropped during resolution: a code is
/// required to address the station in a schedule search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub title: String,
    pub transport_type: Option<String>,
    pub station_type: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Id of the city this station was resolved under.
    pub city_id: String,
}
