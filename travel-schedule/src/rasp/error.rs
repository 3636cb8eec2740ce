//! Provider client error types.

/// Errors from the schedule provider HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum RaspError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check the apikey")]
    Unauthorized,

    /// API returned a non-200 status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}
