//! Catalog error types.

use crate::rasp::RaspError;

/// Failure while loading the station catalog.
///
/// `Clone` because the error is memoized inside the cache's shared in-flight
/// fetch and handed to every awaiting caller, so it carries rendered
/// messages rather than the underlying transport error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// Network, non-200 or decode failure while fetching the catalog
    #[error("catalog fetch failed: {message}")]
    Fetch { message: String },
}

impl From<RaspError> for CatalogError {
    fn from(err: RaspError) -> Self {
        CatalogError::Fetch {
            message: err.to_string(),
        }
    }
}
