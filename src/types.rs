//! Core types for chan-cache

use crate::error::FetchError;

/// The single classified result of a task execution.
///
/// Exactly one outcome is computed per task, at the end of the transfer loop
/// on the worker context, and consumed immediately by the terminal
/// notification dispatch. It is never persisted or retried automatically.
#[derive(Debug)]
pub enum Outcome {
    /// The transfer completed and the destination holds the full resource
    Success {
        /// Final stored length of the destination in bytes
        bytes_written: u64,
    },
    /// The remote returned HTTP 404
    NotFound,
    /// The transfer failed for any other reason
    Failure {
        /// The classified failure cause
        cause: FetchError,
    },
    /// Cancellation was observed at a checkpoint
    Cancelled,
}

impl From<FetchError> for Outcome {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound => Outcome::NotFound,
            FetchError::Cancelled => Outcome::Cancelled,
            cause => Outcome::Failure { cause },
        }
    }
}

/// An ephemeral progress sample, not retained after delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Bytes transferred so far
    pub transferred: u64,
    /// Declared content length when known, otherwise `transferred` itself
    /// (unknown total; use transferred as a lower bound)
    pub total: u64,
}
