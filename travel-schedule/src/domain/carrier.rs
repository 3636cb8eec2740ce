//! Presentation-ready carrier option.

use serde::{Deserialize, Serialize};

/// A formatted row for the carrier list, derived from one [`super::Segment`].
///
/// Created fresh per search and never mutated afterwards, except that the
/// orchestrator may back-fill contact fields the mapping pass lacked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierOption {
    pub carrier_name: String,
    pub logo_url: Option<String>,
    /// Carrier code usable with the provider's carrier-info endpoint.
    pub carrier_code: Option<String>,
    /// Departure date as "D Month".
    pub date_text: String,
    /// Departure time as "HH:mm".
    pub depart: String,
    /// Arrival time as "HH:mm".
    pub arrive: String,
    /// Trip length as "H h M m", "H h" or "M m".
    pub duration_text: String,
    /// Present iff the trip involves a transfer.
    pub transfer_note: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CarrierOption {
    pub fn has_transfer(&self) -> bool {
        self.transfer_note.is_some()
    }
}
