//! Post-search travel segment, before presentation mapping.

use serde::{Deserialize, Serialize};

/// One travel offering from a between-stations search.
///
/// Produced by [`crate::rasp::convert::map_segments`], which already applied
/// the carrier-fallback and transfer-detection rules; consumers never look at
/// the raw provider shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub carrier_name: String,
    pub carrier_logo_url: Option<String>,
    pub carrier_code: Option<String>,
    /// Departure timestamp as received (ISO 8601, offset usually present).
    pub departure_iso: String,
    /// Arrival timestamp as received.
    pub arrival_iso: String,
    pub has_transfer: bool,
    pub carrier_email: Option<String>,
    pub carrier_phone: Option<String>,
}
