//! Poll configuration
//!
//! Controls how often a submitted job is queried and when the poller gives
//! up locally. The effective timeout is `max_attempts × interval`; no
//! remote-side timeout is assumed.

use std::time::Duration;

use crate::error::{PollerError, Result};

/// Upper bound on status queries for one job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptLimit {
    /// At most this many queries (must be at least 1)
    Limited(u32),
    /// Poll until the job finishes or the caller cancels
    Unbounded,
}

impl AttemptLimit {
    /// Interpret a raw count, with `0` meaning unbounded
    pub fn from_count(count: u32) -> Self {
        if count == 0 {
            AttemptLimit::Unbounded
        } else {
            AttemptLimit::Limited(count)
        }
    }

    /// Whether query number `attempt` (1-based) may be issued
    pub fn permits(&self, attempt: u32) -> bool {
        match self {
            AttemptLimit::Limited(max) => attempt <= *max,
            AttemptLimit::Unbounded => true,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if *self == AttemptLimit::Limited(0) {
            return Err(PollerError::invalid("max_attempts must be at least 1"));
        }
        Ok(())
    }
}

impl std::fmt::Display for AttemptLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptLimit::Limited(max) => write!(f, "{}", max),
            AttemptLimit::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Polling parameters for one remote job
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Suspension between two status queries of a job that is still running
    pub interval: Duration,

    /// Maximum number of status queries before the job is reported as timed out
    pub max_attempts: AttemptLimit,

    /// Wait between submission and the first status query
    ///
    /// Freshly submitted commands are often not yet visible to status queries.
    pub settle_delay: Duration,
}

impl PollPolicy {
    /// Creates a policy with the given interval and attempt limit and no settle delay
    pub fn new(interval: Duration, max_attempts: AttemptLimit) -> Self {
        Self {
            interval,
            max_attempts,
            settle_delay: Duration::ZERO,
        }
    }

    /// Creates a policy from environment variables
    ///
    /// Expected environment variables:
    /// - CLOUDCTL_POLL_INTERVAL_MS (optional, default: 1000)
    /// - CLOUDCTL_MAX_ATTEMPTS (optional, 0 = unbounded, default: 120)
    /// - CLOUDCTL_SETTLE_DELAY_MS (optional, default: 1500)
    ///
    /// Unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let interval = std::env::var("CLOUDCTL_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.interval);

        let max_attempts = std::env::var("CLOUDCTL_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .map(AttemptLimit::from_count)
            .unwrap_or(defaults.max_attempts);

        let settle_delay = std::env::var("CLOUDCTL_SETTLE_DELAY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.settle_delay);

        Self {
            interval,
            max_attempts,
            settle_delay,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: AttemptLimit) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Validates the policy
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(PollerError::invalid("poll interval must be greater than 0"));
        }

        self.max_attempts.validate()
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: AttemptLimit::Limited(120),
            settle_delay: Duration::from_millis(1500),
        }
    }
}
