//! Error types for remote command execution

use thiserror::Error;

/// Error returned by a capability implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for poller operations
pub type Result<T> = std::result::Result<T, PollerError>;

/// Errors that can occur while submitting or awaiting a remote job
///
/// A job that runs out of attempts is not an error: it resolves to a
/// [`JobResult`](crate::JobResult) with status
/// [`JobStatus::TimedOut`](crate::JobStatus::TimedOut).
#[derive(Debug, Error)]
pub enum PollerError {
    /// Input did not satisfy the operation's constraints; nothing was sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The submission call failed or produced no usable handle
    #[error("Command submission to {target} failed: {source}")]
    Submission {
        target: String,
        #[source]
        source: BoxError,
    },

    /// A status query failed; polling stopped at this attempt
    #[error("Status query {attempt} for command {handle} failed: {source}")]
    StatusQuery {
        handle: String,
        attempt: u32,
        #[source]
        source: BoxError,
    },

    /// The caller cancelled the wait before the job finished
    #[error("Waiting for command {handle} was cancelled after {attempts} status queries")]
    Cancelled { handle: String, attempts: u32 },
}

impl PollerError {
    /// Create an invalid request error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Check if this error came from the submission call
    pub fn is_submission(&self) -> bool {
        matches!(self, Self::Submission { .. })
    }

    /// Check if this error came from a status query
    pub fn is_status_query(&self) -> bool {
        matches!(self, Self::StatusQuery { .. })
    }

    /// Check if this error is a caller cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
