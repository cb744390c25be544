use thiserror::Error;

/// Failure of a queued remote request.
///
/// Transient variants are retried with backoff; the rest settle the caller at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Remote answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Connection, TLS or body transfer failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// Attempt exceeded the per-attempt timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Remote answered 2xx without usable content.
    #[error("empty response from remote")]
    EmptyResponse,

    /// Remote answered 2xx with a body that could not be parsed.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Missing configuration such as the API key; never retried.
    #[error("{0}")]
    NotConfigured(String),

    /// Throttler shut down or the request was dropped before it settled.
    #[error("request canceled")]
    Canceled,

    /// Operation panicked or broke an internal contract.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RequestError {
    /// Whether the throttler may retry after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RequestError::Http { .. }
                | RequestError::Transport(_)
                | RequestError::Timeout { .. }
                | RequestError::EmptyResponse
                | RequestError::Decode(_)
        )
    }

    /// HTTP 429 from the remote.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
