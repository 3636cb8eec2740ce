//! Segment → carrier option mapping and time formatting.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::domain::{CarrierOption, Segment};

/// Shown when a timestamp cannot be parsed.
const UNPARSEABLE: &str = "—";

/// Note attached to options whose trip involves a transfer.
const TRANSFER_NOTE: &str = "with transfer";

/// A provider timestamp, parsed both as the wall-clock time in its own UTC
/// offset (what a traveller standing at the station sees) and, when the
/// offset was present, as an absolute instant for duration arithmetic.
struct Stamp {
    wall: NaiveDateTime,
    instant: Option<DateTime<FixedOffset>>,
}

/// Parse an ISO 8601 timestamp, tolerating the provider's offset-less
/// variant.
fn parse_stamp(iso: &str) -> Option<Stamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(Stamp {
            wall: dt.naive_local(),
            instant: Some(dt),
        });
    }
    NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|wall| Stamp {
            wall,
            instant: None,
        })
}

/// Build a presentation-ready option from a segment.
pub fn option_from_segment(segment: &Segment) -> CarrierOption {
    CarrierOption {
        carrier_name: segment.carrier_name.clone(),
        logo_url: segment.carrier_logo_url.clone(),
        carrier_code: segment.carrier_code.clone(),
        date_text: date_text(&segment.departure_iso),
        depart: time_text(&segment.departure_iso),
        arrive: time_text(&segment.arrival_iso),
        duration_text: duration_text(&segment.departure_iso, &segment.arrival_iso),
        transfer_note: segment.has_transfer.then(|| TRANSFER_NOTE.to_string()),
        email: segment.carrier_email.clone(),
        phone: segment.carrier_phone.clone(),
    }
}

/// "HH:mm" in the timestamp's own offset.
fn time_text(iso: &str) -> String {
    parse_stamp(iso)
        .map(|s| s.wall.format("%H:%M").to_string())
        .unwrap_or_else(|| UNPARSEABLE.to_string())
}

/// "D Month" of the departure day.
fn date_text(iso: &str) -> String {
    parse_stamp(iso)
        .map(|s| s.wall.format("%-d %B").to_string())
        .unwrap_or_else(|| UNPARSEABLE.to_string())
}

/// Arrival minus departure, rendered as "H h M m", "H h" or "M m".
///
/// Offsets may differ between the endpoints of one trip, so the difference
/// is taken between absolute instants whenever both are available.
fn duration_text(dep_iso: &str, arr_iso: &str) -> String {
    let (Some(dep), Some(arr)) = (parse_stamp(dep_iso), parse_stamp(arr_iso)) else {
        return UNPARSEABLE.to_string();
    };

    let minutes = match (dep.instant, arr.instant) {
        (Some(d), Some(a)) => (a - d).num_minutes(),
        _ => (arr.wall - dep.wall).num_minutes(),
    }
    .max(0);

    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{m} m"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(dep: &str, arr: &str, transfer: bool) -> Segment {
        Segment {
            carrier_name: "РЖД".into(),
            carrier_logo_url: None,
            carrier_code: Some("112".into()),
            departure_iso: dep.into(),
            arrival_iso: arr.into(),
            has_transfer: transfer,
            carrier_email: None,
            carrier_phone: None,
        }
    }

    #[test]
    fn times_rendered_in_own_offset() {
        let opt = option_from_segment(&segment(
            "2024-03-01T06:15:00+03:00",
            "2024-03-01T12:05:00+03:00",
            false,
        ));

        assert_eq!(opt.depart, "06:15");
        assert_eq!(opt.arrive, "12:05");
        assert_eq!(opt.duration_text, "5 h 50 m");
        assert_eq!(opt.date_text, "1 March");
        assert!(opt.transfer_note.is_none());
    }

    #[test]
    fn transfer_note_present_iff_transfer() {
        let opt = option_from_segment(&segment(
            "2024-03-01T06:15:00+03:00",
            "2024-03-01T12:05:00+03:00",
            true,
        ));
        assert!(opt.transfer_note.is_some());
        assert!(opt.has_transfer());
    }

    #[test]
    fn duration_across_offsets_uses_instants() {
        // 06:00 UTC+3 to 08:00 UTC+5 is three wall-clock hours apart but
        // only one elapsed hour.
        let opt = option_from_segment(&segment(
            "2024-03-01T06:00:00+03:00",
            "2024-03-01T09:00:00+05:00",
            false,
        ));
        assert_eq!(opt.duration_text, "1 h");
    }

    #[test]
    fn offsetless_timestamps_fall_back_to_wall_clock() {
        let opt = option_from_segment(&segment(
            "2024-03-01T06:15:00",
            "2024-03-01T06:45:00",
            false,
        ));
        assert_eq!(opt.depart, "06:15");
        assert_eq!(opt.duration_text, "30 m");
    }

    #[test]
    fn whole_hours_render_without_minutes() {
        let opt = option_from_segment(&segment(
            "2024-03-01T10:00:00+03:00",
            "2024-03-01T13:00:00+03:00",
            false,
        ));
        assert_eq!(opt.duration_text, "3 h");
    }

    #[test]
    fn unparseable_timestamp_renders_placeholder() {
        let opt = option_from_segment(&segment("garbage", "2024-03-01T10:00:00+03:00", false));
        assert_eq!(opt.depart, "—");
        assert_eq!(opt.duration_text, "—");
    }

    #[test]
    fn negative_duration_clamps_to_zero() {
        let opt = option_from_segment(&segment(
            "2024-03-01T12:00:00+03:00",
            "2024-03-01T11:00:00+03:00",
            false,
        ));
        assert_eq!(opt.duration_text, "0 m");
    }
}
