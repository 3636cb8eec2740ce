//! Provider API response DTOs.
//!
//! These map directly to the schedule provider's JSON. Every field is
//! `Option` because the upstream omits fields freely, and historical
//! response variants disagree about which fields are present at all.
//! All "pick the first non-null source" logic lives in [`super::convert`].

use serde::Deserialize;

/// Response from `GET /stations_list/`: the full hierarchical catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AllStationsResponse {
    #[serde(default)]
    pub countries: Vec<CountryDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryDto {
    pub title: Option<String>,
    pub codes: Option<CodesDto>,
    #[serde(default)]
    pub regions: Vec<RegionDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionDto {
    pub title: Option<String>,
    #[serde(default)]
    pub settlements: Vec<SettlementDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettlementDto {
    pub title: Option<String>,
    pub codes: Option<CodesDto>,
    #[serde(default)]
    pub stations: Vec<StationDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationDto {
    pub title: Option<String>,
    pub codes: Option<CodesDto>,
    pub transport_type: Option<String>,
    pub station_type: Option<String>,
    pub lat: Option<f64>,
    /// The catalog uses `lng`; the search API uses `lon` elsewhere.
    pub lng: Option<f64>,
}

/// Provider code container. Only the `yandex_code` member is stable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodesDto {
    pub yandex_code: Option<String>,
}

/// Response from `GET /search/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

/// One raw segment. Carrier info may sit on `thread` or, for multi-leg
/// itineraries, only inside `details`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSegment {
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub thread: Option<ThreadDto>,
    #[serde(default)]
    pub details: Vec<DetailDto>,
    pub has_transfers: Option<bool>,
    /// Transfer points; some response variants carry this instead of
    /// `has_transfers`.
    #[serde(default)]
    pub transfers: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailDto {
    pub thread: Option<ThreadDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThreadDto {
    pub carrier: Option<CarrierDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierDto {
    pub title: Option<String>,
    pub logo: Option<String>,
    pub codes: Option<CarrierCodesDto>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierCodesDto {
    pub yandex: Option<String>,
}

/// Response from `GET /carrier/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierInfoResponse {
    pub title: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub logo: Option<String>,
}

/// Response from `GET /copyright/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopyrightResponse {
    pub copyright: Option<CopyrightDto>,
}

impl CopyrightResponse {
    /// The attribution line, when the provider sent one.
    pub fn text(&self) -> Option<&str> {
        self.copyright.as_ref()?.text.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopyrightDto {
    pub text: Option<String>,
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_catalog() {
        let json = r#"{
            "countries": [
                {
                    "title": "Россия",
                    "codes": {"yandex_code": "c146"},
                    "regions": [
                        {
                            "title": "Москва и Московская область",
                            "settlements": [
                                {
                                    "title": "Москва",
                                    "codes": {"yandex_code": "c213"},
                                    "stations": [
                                        {
                                            "title": "Курский вокзал",
                                            "codes": {"yandex_code": "s9600742"},
                                            "transport_type": "train",
                                            "station_type": "train_station",
                                            "lat": 55.758,
                                            "lng": 37.661
                                        }
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let catalog: AllStationsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.countries.len(), 1);

        let country = &catalog.countries[0];
        assert_eq!(country.title.as_deref(), Some("Россия"));

        let settlement = &country.regions[0].settlements[0];
        assert_eq!(
            settlement.codes.as_ref().unwrap().yandex_code.as_deref(),
            Some("c213")
        );

        let station = &settlement.stations[0];
        assert_eq!(station.transport_type.as_deref(), Some("train"));
        assert_eq!(station.lng, Some(37.661));
    }

    #[test]
    fn deserialize_catalog_with_missing_codes() {
        let json = r#"{
            "countries": [
                {
                    "title": "Россия",
                    "regions": [
                        {"settlements": [{"title": "Озёрки"}]}
                    ]
                }
            ]
        }"#;

        let catalog: AllStationsResponse = serde_json::from_str(json).unwrap();
        let settlement = &catalog.countries[0].regions[0].settlements[0];
        assert!(settlement.codes.is_none());
        assert!(settlement.stations.is_empty());
    }

    #[test]
    fn deserialize_segment_with_top_level_carrier() {
        let json = r#"{
            "departure": "2024-03-01T06:15:00+03:00",
            "arrival": "2024-03-01T12:05:00+03:00",
            "thread": {"carrier": {"title": "РЖД", "codes": {"yandex": "112"}}},
            "has_transfers": false
        }"#;

        let seg: RawSegment = serde_json::from_str(json).unwrap();
        assert_eq!(seg.has_transfers, Some(false));
        let carrier = seg.thread.unwrap().carrier.unwrap();
        assert_eq!(carrier.title.as_deref(), Some("РЖД"));
        assert_eq!(carrier.codes.unwrap().yandex.as_deref(), Some("112"));
    }

    #[test]
    fn deserialize_segment_with_detail_legs_only() {
        let json = r#"{
            "departure": "2024-03-01T06:15:00+03:00",
            "arrival": "2024-03-01T18:40:00+03:00",
            "details": [
                {"thread": null},
                {"thread": {"carrier": {"title": "RZD"}}}
            ],
            "transfers": [{"title": "Тверь"}]
        }"#;

        let seg: RawSegment = serde_json::from_str(json).unwrap();
        assert!(seg.thread.is_none());
        assert!(seg.has_transfers.is_none());
        assert_eq!(seg.transfers.len(), 1);
        assert_eq!(seg.details.len(), 2);
    }

    #[test]
    fn deserialize_copyright() {
        let json = r#"{"copyright": {"text": "Данные предоставлены сервисом Яндекс.Расписания", "url": "https://rasp.yandex.ru/"}}"#;
        let resp: CopyrightResponse = serde_json::from_str(json).unwrap();
        assert!(resp.copyright.unwrap().text.unwrap().contains("Яндекс"));
    }
}
