//! Conversion from provider search DTOs to domain segments.
//!
//! The provider's response variants disagree about where carrier info and the
//! transfer signal live, so every fallback chain is centralized here; callers
//! only ever see [`Segment`].

use tracing::debug;

use crate::domain::Segment;

use super::types::{CarrierDto, RawSegment, SearchResponse};

/// Placeholder shown when no response variant carried a carrier title.
const UNKNOWN_CARRIER: &str = "—";

/// Map a search response to domain segments.
///
/// Segments missing a departure or arrival timestamp are dropped: they
/// cannot be rendered and are not a valid result.
pub fn map_segments(response: &SearchResponse) -> Vec<Segment> {
    response
        .segments
        .iter()
        .filter_map(map_segment)
        .collect()
}

fn map_segment(raw: &RawSegment) -> Option<Segment> {
    let (Some(departure), Some(arrival)) = (raw.departure.as_ref(), raw.arrival.as_ref()) else {
        debug!("dropping segment without departure/arrival");
        return None;
    };

    let carrier = pick_carrier(raw);

    Some(Segment {
        carrier_name: carrier
            .and_then(|c| c.title.clone())
            .unwrap_or_else(|| UNKNOWN_CARRIER.to_string()),
        carrier_logo_url: carrier
            .and_then(|c| c.logo.as_deref())
            .and_then(normalize_logo_url),
        carrier_code: carrier
            .and_then(|c| c.codes.as_ref())
            .and_then(|codes| codes.yandex.clone()),
        departure_iso: departure.clone(),
        arrival_iso: arrival.clone(),
        has_transfer: detect_transfer(raw),
        carrier_email: carrier.and_then(|c| c.email.clone()),
        carrier_phone: carrier.and_then(|c| c.phone.clone()),
    })
}

/// Carrier lookup: `thread.carrier` if present, else the first detail leg of
/// a multi-leg itinerary that has one. Transfer itineraries often omit the
/// top-level thread carrier entirely.
fn pick_carrier(raw: &RawSegment) -> Option<&CarrierDto> {
    raw.thread
        .as_ref()
        .and_then(|t| t.carrier.as_ref())
        .or_else(|| {
            raw.details
                .iter()
                .find_map(|d| d.thread.as_ref().and_then(|t| t.carrier.as_ref()))
        })
}

/// Transfer detection, in priority order: the explicit `has_transfers` flag,
/// else a non-empty `transfers` list, else more than one detail leg.
/// Response variants disagree on which field carries the signal, so all
/// three are checked before concluding "no transfer".
fn detect_transfer(raw: &RawSegment) -> bool {
    if let Some(flag) = raw.has_transfers {
        return flag;
    }
    if !raw.transfers.is_empty() {
        return true;
    }
    raw.details.len() > 1
}

/// Rewrite a protocol-relative logo URL to https; pass absolute URLs through;
/// empty values yield no URL.
pub(crate) fn normalize_logo_url(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if let Some(rest) = raw.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    Some(raw.to_string())
}
