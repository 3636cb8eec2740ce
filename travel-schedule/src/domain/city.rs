//! City entity and its identifier scheme.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;

/// A settlement from the catalog, flattened for pickers and resolution.
///
/// `id` is the provider's canonical settlement code when one exists;
/// otherwise it is a synthetic composite key (see [`synthetic_city_id`]).
/// Synthetic ids are stable across fetches of the same catalog but must
/// never be sent to the provider as codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub title: String,
    pub region: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Transport types seen across the city's stations ("train", "bus", ...).
    pub transport_types: BTreeSet<String>,
}

/// Deterministic identifier for a settlement the provider left uncoded.
///
/// A pure function of the normalized country, region and settlement titles,
/// so two provider records for the same place collapse to one id.
pub fn synthetic_city_id(country: &str, region: &str, settlement: &str) -> String {
    format!(
        "{}|{}|{}",
        normalize(country),
        normalize(region),
        normalize(settlement)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_id_is_normalized() {
        assert_eq!(
            synthetic_city_id("Россия", "Тверская область", "Озёрки"),
            "россия|тверская область|озерки"
        );
    }

    #[test]
    fn synthetic_id_deterministic_across_variants() {
        let a = synthetic_city_id("Россия", "Тверская  область", "Озёрки");
        let b = synthetic_city_id("РОССИЯ", "Тверская область", "Озерки");
        assert_eq!(a, b);
    }
}
