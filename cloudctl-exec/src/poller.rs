//! Job poller
//!
//! Submits a command to a target, then queries its status at a fixed interval
//! until it finishes, the attempt limit runs out, or the caller cancels.
//!
//! ```text
//! Created --submit()--> Submitted --query(Pending/InProgress)--> Submitted
//! Submitted --query(Success|Failed|Cancelled)--> Terminal
//! Submitted --attempts exhausted--> TimedOut
//! ```
//!
//! The poller holds no per-job state, so one instance can await any number of
//! independent jobs concurrently.

use std::sync::Arc;
use tokio::time::{self, Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::capability::{CommandSubmitter, StatusSource};
use crate::config::{AttemptLimit, PollPolicy};
use crate::error::{PollerError, Result};
use crate::job::{CommandPayload, JobHandle, JobOutput, JobResult, JobStatus};

/// Receives progress notifications while a job is polled
///
/// Used by front ends to render progress; the poller itself does no formatting.
pub trait PollObserver: Send + Sync {
    /// Called once a job has been submitted
    fn on_submitted(&self, _handle: &JobHandle, _target: &str) {}

    /// Called after every successful status query
    fn on_status(&self, _handle: &JobHandle, _attempt: u32, _status: JobStatus) {}
}

/// Observer that ignores every notification
pub struct NoopObserver;

impl PollObserver for NoopObserver {}

/// Drives remote jobs from submission to a terminal result
#[derive(Clone)]
pub struct JobPoller {
    submitter: Arc<dyn CommandSubmitter>,
    status: Arc<dyn StatusSource>,
    observer: Arc<dyn PollObserver>,
}

impl JobPoller {
    /// Creates a poller from separate capabilities
    pub fn new(submitter: Arc<dyn CommandSubmitter>, status: Arc<dyn StatusSource>) -> Self {
        Self {
            submitter,
            status,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Creates a poller from one client providing both capabilities
    pub fn from_client<C>(client: Arc<C>) -> Self
    where
        C: CommandSubmitter + StatusSource + 'static,
    {
        let submitter: Arc<dyn CommandSubmitter> = client.clone();
        let status: Arc<dyn StatusSource> = client;
        Self::new(submitter, status)
    }

    /// Attaches a progress observer
    pub fn with_observer(mut self, observer: Arc<dyn PollObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Submits `payload` to `target`
    ///
    /// Calls the submission capability exactly once. Failures, including a
    /// response without a handle, are returned as [`PollerError::Submission`]
    /// and never retried.
    pub async fn submit(&self, target: &str, payload: &CommandPayload) -> Result<JobHandle> {
        if target.trim().is_empty() {
            return Err(PollerError::invalid("target cannot be empty"));
        }
        payload.validate()?;

        debug!("Submitting document {} to {}", payload.document_id, target);

        let submitted = self
            .submitter
            .submit_command(target, &payload.document_id, &payload.parameters())
            .await
            .map_err(|source| PollerError::Submission {
                target: target.to_string(),
                source,
            })?;

        let handle = submitted
            .and_then(|id| JobHandle::parse(id).ok())
            .ok_or_else(|| PollerError::Submission {
                target: target.to_string(),
                source: "no command id was returned".into(),
            })?;

        info!("Submitted command {} to {}", handle, target);
        self.observer.on_submitted(&handle, target);

        Ok(handle)
    }

    /// Polls `handle` on `target` until it reaches a terminal status
    ///
    /// Issues at most `max_attempts` status queries, suspending for
    /// `interval` after each non-terminal one except the last. Returns a
    /// [`JobStatus::TimedOut`] result when the attempts run out. A failed
    /// query aborts the wait with [`PollerError::StatusQuery`].
    ///
    /// `cancel` is checked before every query and interrupts the suspension.
    pub async fn await_completion(
        &self,
        handle: &JobHandle,
        target: &str,
        interval: Duration,
        max_attempts: AttemptLimit,
        cancel: &CancellationToken,
    ) -> Result<JobResult> {
        if target.trim().is_empty() {
            return Err(PollerError::invalid("target cannot be empty"));
        }
        if interval.is_zero() {
            return Err(PollerError::invalid("poll interval must be greater than 0"));
        }
        max_attempts.validate()?;

        if max_attempts == AttemptLimit::Unbounded {
            warn!(
                "Polling command {} without an attempt limit; only cancellation can stop it",
                handle
            );
        }

        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                info!(
                    "Stopped waiting for command {} after {} queries",
                    handle, attempts
                );
                return Err(PollerError::Cancelled {
                    handle: handle.to_string(),
                    attempts,
                });
            }

            attempts += 1;

            let report = self
                .status
                .query_status(handle.as_str(), target)
                .await
                .map_err(|source| PollerError::StatusQuery {
                    handle: handle.to_string(),
                    attempt: attempts,
                    source,
                })?;

            let status = JobStatus::from(report.status);
            debug!(
                "Command {} on {} is {} (attempt {}/{})",
                handle, target, status, attempts, max_attempts
            );
            self.observer.on_status(handle, attempts, status);

            if report.status.is_terminal() {
                info!(
                    "Command {} finished with status {} after {} queries",
                    handle, status, attempts
                );
                let output = JobOutput {
                    stdout: report.stdout,
                    stderr: report.stderr,
                };
                return Ok(JobResult::finished(handle.clone(), status, attempts, output));
            }

            if !max_attempts.permits(attempts + 1) {
                warn!("Command {} did not finish within {} queries", handle, attempts);
                return Ok(JobResult::timed_out(handle.clone(), attempts));
            }

            if !sleep_unless_cancelled(interval, cancel).await {
                info!(
                    "Stopped waiting for command {} after {} queries",
                    handle, attempts
                );
                return Err(PollerError::Cancelled {
                    handle: handle.to_string(),
                    attempts,
                });
            }
        }
    }

    /// Submits `payload` and waits for it under `policy`
    pub async fn run(
        &self,
        target: &str,
        payload: &CommandPayload,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> Result<JobResult> {
        policy.validate()?;

        let handle = self.submit(target, payload).await?;

        if !policy.settle_delay.is_zero()
            && !sleep_unless_cancelled(policy.settle_delay, cancel).await
        {
            return Err(PollerError::Cancelled {
                handle: handle.to_string(),
                attempts: 0,
            });
        }

        self.await_completion(
            &handle,
            target,
            policy.interval,
            policy.max_attempts,
            cancel,
        )
        .await
    }
}

/// Sleeps for `duration`, returning `false` if cancelled first
async fn sleep_unless_cancelled(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = time::sleep(duration) => true,
        _ = cancel.cancelled() => false,
    }
}
