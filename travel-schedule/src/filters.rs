//! Client-side filtering of carrier options.
//!
//! Filters are applied after the availability check, purely in memory. An
//! empty or absent selection is a no-op so callers can pass the current
//! (possibly untouched) filter screen state straight through.

use std::collections::BTreeSet;

use crate::domain::CarrierOption;

/// Departure time-of-day band, as half-open hour ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeBand {
    /// 06:00 to 12:00.
    Morning,
    /// 12:00 to 18:00.
    Day,
    /// 18:00 to 24:00.
    Evening,
    /// 00:00 to 06:00.
    Night,
}

impl TimeBand {
    pub fn contains_hour(self, hour: u32) -> bool {
        match self {
            TimeBand::Morning => (6..12).contains(&hour),
            TimeBand::Day => (12..18).contains(&hour),
            TimeBand::Evening => (18..24).contains(&hour),
            TimeBand::Night => hour < 6,
        }
    }
}

/// What the user picked on the filter screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiltersSelection {
    /// Keep options departing within any of these bands.
    pub time_bands: BTreeSet<TimeBand>,
    /// `Some(false)` keeps only direct options; `Some(true)` imposes no
    /// constraint.
    pub transfers: Option<bool>,
}

impl FiltersSelection {
    /// Whether the selection is complete enough to apply.
    ///
    /// The filter screen asks both questions; a selection applies only once
    /// at least one band is picked and the transfer choice has been made.
    pub fn can_apply(&self) -> bool {
        !self.time_bands.is_empty() && self.transfers.is_some()
    }
}

/// Apply a filter selection to a list of options.
///
/// A partial selection (see [`FiltersSelection::can_apply`]) is a no-op.
/// Transfer filtering runs first, then time bands. Options whose departure
/// time does not parse as `HH:MM` are excluded by the time-band filter.
pub fn apply_filters(
    options: &[CarrierOption],
    selection: Option<&FiltersSelection>,
) -> Vec<CarrierOption> {
    let Some(selection) = selection.filter(|s| s.can_apply()) else {
        return options.to_vec();
    };

    options
        .iter()
        .filter(|option| {
            if selection.transfers == Some(false) && option.has_transfer() {
                return false;
            }
            match depart_hour(&option.depart) {
                Some(hour) => selection
                    .time_bands
                    .iter()
                    .any(|band| band.contains_hour(hour)),
                None => false,
            }
        })
        .cloned()
        .collect()
}

fn depart_hour(depart: &str) -> Option<u32> {
    let (hour, _minute) = depart.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    (hour < 24).then_some(hour)
}
