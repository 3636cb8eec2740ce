//! Schedule provider HTTP client.
//!
//! Thin async wrapper over the provider's REST endpoints. Every response is
//! read as text first and decoded with `serde_json`: one catalog variant
//! arrives as chunked `text/html` wrapping JSON bytes, and decoding from the
//! reassembled body handles both shapes identically.

use chrono::NaiveDate;
use tracing::debug;

use crate::availability::SegmentSource;
use crate::catalog::{CatalogError, CatalogSource};
use crate::domain::Segment;

use super::convert::map_segments;
use super::error::RaspError;
use super::types::{
    AllStationsResponse, CarrierInfoResponse, CopyrightResponse, SearchResponse,
};

/// Default base URL of the schedule provider.
const DEFAULT_BASE_URL: &str = "https://api.rasp.yandex.net/v3.0";

/// Default response language.
const DEFAULT_LANG: &str = "ru_RU";

/// Configuration for the provider client.
#[derive(Debug, Clone)]
pub struct RaspConfig {
    /// API key, sent as the `apikey` query parameter.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Response language (`lang` query parameter).
    pub lang: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl RaspConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: DEFAULT_LANG.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the response language.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the schedule provider API.
#[derive(Debug, Clone)]
pub struct RaspClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    lang: String,
}

impl RaspClient {
    /// Create a new client with the given configuration.
    pub fn new(config: RaspConfig) -> Result<Self, RaspError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
            lang: config.lang,
        })
    }

    /// Fetch the full hierarchical station catalog.
    pub async fn stations_list(&self) -> Result<AllStationsResponse, RaspError> {
        let url = format!("{}/stations_list/", self.base_url);
        debug!(%url, "stations_list request");

        let body = self
            .get_text(&url, &[("format", "json"), ("lang", &self.lang)])
            .await?;

        let catalog: AllStationsResponse = decode(&body)?;
        debug!(countries = catalog.countries.len(), "stations_list decoded");
        Ok(catalog)
    }

    /// Search for segments between two station codes on a date.
    pub async fn segments_between(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
        transport: Option<&str>,
    ) -> Result<Vec<Segment>, RaspError> {
        let url = format!("{}/search/", self.base_url);
        let date = date.format("%Y-%m-%d").to_string();

        let mut query: Vec<(&str, &str)> = vec![
            ("from", from),
            ("to", to),
            ("date", &date),
            ("format", "json"),
            ("lang", &self.lang),
            ("transfers", "true"),
        ];
        if let Some(t) = transport.filter(|t| !t.is_empty()) {
            query.push(("transport_types", t));
        }

        debug!(%from, %to, %date, "search request");
        let body = self.get_text(&url, &query).await?;

        let response: SearchResponse = decode(&body)?;
        let segments = map_segments(&response);
        debug!(
            raw = response.segments.len(),
            mapped = segments.len(),
            "search decoded"
        );
        Ok(segments)
    }

    /// Look up carrier contact details by provider carrier code.
    pub async fn carrier_info(&self, code: &str) -> Result<CarrierInfoResponse, RaspError> {
        let url = format!("{}/carrier/", self.base_url);
        let body = self
            .get_text(&url, &[("code", code), ("format", "json"), ("lang", &self.lang)])
            .await?;
        decode(&body)
    }

    /// Fetch the provider's attribution text.
    pub async fn copyright(&self) -> Result<CopyrightResponse, RaspError> {
        let url = format!("{}/copyright/", self.base_url);
        let body = self.get_text(&url, &[("format", "json")]).await?;
        decode(&body)
    }

    /// Perform a GET with the apikey attached and return the body text.
    /// Only HTTP 200 is a success; anything else is a typed API error.
    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, RaspError> {
        let response = self
            .http
            .get(url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RaspError::Unauthorized);
        }

        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(RaspError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, RaspError> {
    serde_json::from_str(body).map_err(|e| RaspError::Json {
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

impl CatalogSource for RaspClient {
    async fn fetch_catalog(&self) -> Result<AllStationsResponse, CatalogError> {
        self.stations_list().await.map_err(CatalogError::from)
    }
}

impl SegmentSource for RaspClient {
    async fn search(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
        transport: Option<&str>,
    ) -> Result<Vec<Segment>, RaspError> {
        self.segments_between(from, to, date, transport).await
    }

    async fn carrier_contacts(
        &self,
        code: &str,
    ) -> Result<Option<CarrierInfoResponse>, RaspError> {
        self.carrier_info(code).await.map(Some)
    }
}
