//! Travel schedule availability core.
//!
//! Resolves free-text city/station names against the provider's hierarchical
//! station catalog, searches for transport between two stations on a date,
//! and turns the loosely-typed search response into presentation-ready
//! carrier options.

pub mod availability;
pub mod cache;
pub mod catalog;
pub mod domain;
pub mod filters;
pub mod normalize;
pub mod rasp;
