//! Remote capabilities consumed by the poller
//!
//! Both traits are single request/response calls. The poller decides the
//! cadence; implementations must not retry or sleep on their own.

use async_trait::async_trait;
use cloudctl_core::domain::command::InvocationStatus;
use std::collections::HashMap;

use crate::error::BoxError;

/// Submits an execution document to a target
#[async_trait]
pub trait CommandSubmitter: Send + Sync {
    /// Submits a document run against `target`
    ///
    /// # Arguments
    /// * `target` - Identifier of the instance to run on
    /// * `document_id` - Execution document to run
    /// * `parameters` - Document parameters (e.g. `commands`)
    ///
    /// # Returns
    /// The handle of the created job, or `None` if the remote side accepted
    /// the request without creating one
    async fn submit_command(
        &self,
        target: &str,
        document_id: &str,
        parameters: &HashMap<String, Vec<String>>,
    ) -> Result<Option<String>, BoxError>;
}

/// Reports the current status of a submitted job
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Queries the status of `handle` on `target`
    async fn query_status(&self, handle: &str, target: &str) -> Result<StatusReport, BoxError>;
}

/// Snapshot returned by a status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub status: InvocationStatus,
    pub stdout: String,
    pub stderr: String,
}

impl StatusReport {
    /// A report for a job that has not finished yet
    pub fn running(status: InvocationStatus) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// A report for a finished job
    pub fn finished(
        status: InvocationStatus,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}
