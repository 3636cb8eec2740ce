//! Schedule provider client.
//!
//! HTTP client for the rasp (timetable) REST API plus the tolerant DTO
//! layer and the segment-mapping pass that turns raw responses into domain
//! types.
//!
//! The API is forgiving in its own way:
//! - almost every response field is optional in practice, so the DTOs are
//!   Option-heavy and mapping decides what is usable
//! - one catalog variant arrives as chunked `text/html` wrapping JSON bytes,
//!   so responses are read as text and decoded from the reassembled body

mod client;
pub mod convert;
mod error;
pub mod mock;
pub mod types;

pub use client::{RaspClient, RaspConfig};
pub use error::RaspError;
