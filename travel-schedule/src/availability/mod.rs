//! Route availability: resolve both endpoints to station codes, search for
//! segments between them, and present the result as carrier options.

mod options;
mod orchestrator;

pub use options::option_from_segment;
pub use orchestrator::{
    AvailabilityChecker, AvailabilityError, AvailabilityState, SegmentSource,
};
