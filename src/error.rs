//! Error types for chan-cache
//!
//! Two layers of errors exist:
//! - [`Error`] for fallible API surface (task construction, client setup)
//! - [`FetchError`] for the transfer loop's failure taxonomy, which flows
//!   through ordinary `Result` propagation and is classified into a terminal
//!   [`Outcome`](crate::types::Outcome) exactly once per task

use thiserror::Error;

/// Result type alias for chan-cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the crate's constructors and setup paths
#[derive(Debug, Error)]
pub enum Error {
    /// The target URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Failure taxonomy for a single transfer.
///
/// Every failure short-circuits the transfer loop immediately and is
/// classified here at the point of detection; none are retried internally.
/// Retry policy belongs to the external scheduler.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Remote returned HTTP 404
    #[error("remote resource not found")]
    NotFound,

    /// Remote returned a non-success status other than 404
    #[error("remote returned HTTP {status}")]
    Http {
        /// The non-success status code
        status: u16,
    },

    /// Network or connection failure below the HTTP layer, including a
    /// broken stream mid-transfer
    #[error("transport failure: {0}")]
    Transport(String),

    /// The destination could not be opened or written
    #[error("storage failure: {0}")]
    Storage(String),

    /// Cooperative cancellation observed at a checkpoint. Expected, not
    /// exceptional; never logged with a backtrace.
    #[error("cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether this failure is the not-found condition (HTTP 404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display_carries_status() {
        let err = FetchError::Http { status: 503 };
        assert_eq!(err.to_string(), "remote returned HTTP 503");
    }

    #[test]
    fn not_found_flag_is_set_only_for_404() {
        assert!(FetchError::NotFound.is_not_found());
        assert!(!FetchError::Http { status: 500 }.is_not_found());
        assert!(!FetchError::Cancelled.is_not_found());
        assert!(!FetchError::Transport("reset".into()).is_not_found());
        assert!(!FetchError::Storage("denied".into()).is_not_found());
    }

    #[test]
    fn invalid_url_converts_into_error() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.to_string().starts_with("invalid URL"));
    }
}
