//! Domain entities built from the provider catalog and search responses.

mod carrier;
mod city;
mod segment;
mod station;

pub use carrier::CarrierOption;
pub use city::{City, synthetic_city_id};
pub use segment::Segment;
pub use station::Station;
