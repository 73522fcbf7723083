//! Error taxonomy for RGL API calls.

use std::time::Duration;

use reqwest::StatusCode;

/// Boxed error produced by an [`HttpExecutor`](crate::HttpExecutor).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used by every RGL API operation.
pub type Result<T> = std::result::Result<T, RglError>;

/// Why an admission wait on the token bucket ended without a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    /// The call context was cancelled.
    #[error("context cancelled")]
    Cancelled,
    /// The call context deadline elapsed, or would elapse before a token
    /// becomes available.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Failure of the underlying HTTP execution after admission.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The executor did not finish within the request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The call context ended while the exchange was in flight.
    #[error("request abandoned")]
    Aborted(#[source] WaitError),
    /// The executor reported an error (connection, TLS, body read, ...).
    #[error(transparent)]
    Executor(BoxError),
}

/// Errors returned by [`RglClient`](crate::RglClient) calls.
///
/// Every variant names the stage that failed so callers can decide
/// whether to back off ([`RglError::RateLimited`]), fix their input
/// ([`RglError::OutOfRange`]) or give up.
#[derive(Debug, thiserror::Error)]
pub enum RglError {
    /// A precondition on the call arguments failed. No request was sent.
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Waiting for rate-limit admission was interrupted. No request was sent.
    #[error("failed to wait for request")]
    WaitFailed(#[source] WaitError),

    /// The request URL could not be built.
    #[error("failed to make request: {path}")]
    InvalidUrl {
        /// Path that failed to join onto the base URL.
        path: String,
        /// Parse error.
        #[source]
        source: url::ParseError,
    },

    /// The request could not be delivered or the response could not be read.
    #[error("failed to call endpoint")]
    RequestFailed(#[source] TransportError),

    /// The request body could not be serialized.
    #[error("failed to marshal request payload")]
    EncodeFailed(#[source] serde_json::Error),

    /// Upstream answered 429 Too Many Requests.
    #[error("rate limited (429)")]
    RateLimited,

    /// Upstream answered with a status outside `200..=226`.
    #[error("invalid status code: {0}")]
    BadStatus(StatusCode),

    /// The response body was not the expected JSON.
    #[error("failed to unmarshal json response payload")]
    DecodeFailed(#[source] serde_json::Error),
}

impl RglError {
    /// Builds an [`RglError::OutOfRange`].
    pub(crate) fn out_of_range(message: impl Into<String>) -> Self {
        Self::OutOfRange(message.into())
    }

    /// Returns `true` if upstream rejected the call with HTTP 429.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// Returns `true` if the call was rejected before any network activity.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange(_))
    }

    /// HTTP status carried by [`RglError::BadStatus`].
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::BadStatus(status) => Some(*status),
            _ => None,
        }
    }
}
