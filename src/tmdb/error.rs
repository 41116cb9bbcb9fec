//! Upstream failures and how they map onto our own responses

use axum::http::StatusCode;
use thiserror::Error;

/// Failure talking to the metadata provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The provider answered with a non-2xx status.
    #[error("Upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    /// No answer within the configured timeout.
    #[error("Upstream request timed out")]
    Timeout,

    /// Connection, DNS, TLS or proxy failure.
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// A 2xx answer whose body was not valid JSON.
    #[error("Upstream response could not be decoded: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Status reported to our own callers.
    ///
    /// Provider statuses pass through; failures without one map to 504 for
    /// timeouts and 502 otherwise.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UpstreamError::Status { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            UpstreamError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            UpstreamError::Transport(_) | UpstreamError::Decode(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message reported to our own callers.
    pub fn client_message(&self) -> String {
        match self {
            UpstreamError::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Status { status, .. } => *status == 429 || *status >= 500,
            UpstreamError::Timeout | UpstreamError::Transport(_) => true,
            UpstreamError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

pub type UpstreamResult<T> = Result<T, UpstreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_passthrough() {
        let err = UpstreamError::Status {
            status: 404,
            message: "The resource you requested could not be found.".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.client_message(),
            "The resource you requested could not be found."
        );
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        assert_eq!(UpstreamError::Timeout.status_code(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_transient_classification() {
        let status = |status| UpstreamError::Status {
            status,
            message: String::new(),
        };
        assert!(status(500).is_transient());
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(401).is_transient());
        assert!(!status(404).is_transient());
        assert!(UpstreamError::Timeout.is_transient());
        assert!(!UpstreamError::Decode("bad".into()).is_transient());
    }
}
