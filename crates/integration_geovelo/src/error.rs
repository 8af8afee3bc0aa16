//! Geovelo error types

use thiserror::Error;

/// Errors returned by the bike router
#[derive(Debug, Error)]
pub enum GeoveloError {
    /// Connection to the router failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The router rejected the request
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The answer could not be decoded
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Rejected API key
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Router is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl GeoveloError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::ServiceUnavailable(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}
