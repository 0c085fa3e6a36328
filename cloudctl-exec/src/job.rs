//! Job types
//!
//! A job is one command submitted to one target. It is created fresh for every
//! run and dropped once its result has been reported.

use cloudctl_core::domain::command::{
    COMMANDS_PARAMETER, InvocationStatus, RUN_SHELL_SCRIPT_DOCUMENT,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{PollerError, Result};

/// Opaque identifier of a submitted job
///
/// Never empty. Only obtainable from a successful submission or by parsing a
/// known identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct JobHandle(String);

impl JobHandle {
    /// Parse a handle, rejecting blank identifiers
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(PollerError::invalid("command id cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to run on the target
#[derive(Debug, Clone)]
pub struct CommandPayload {
    pub document_id: String,
    pub command: String,
}

impl CommandPayload {
    /// A single shell command run through the shell-script document
    pub fn shell(command: impl Into<String>) -> Self {
        Self {
            document_id: RUN_SHELL_SCRIPT_DOCUMENT.to_string(),
            command: command.into(),
        }
    }

    /// Document parameters carrying the command
    pub fn parameters(&self) -> HashMap<String, Vec<String>> {
        HashMap::from([(COMMANDS_PARAMETER.to_string(), vec![self.command.clone()])])
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(PollerError::invalid("command cannot be empty"));
        }
        if self.document_id.trim().is_empty() {
            return Err(PollerError::invalid("document id cannot be empty"));
        }
        Ok(())
    }
}

/// Status of a job as seen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Pending,
    InProgress,
    Success,
    Failed,
    Cancelled,
    /// Attempts ran out locally; the job may still be progressing remotely
    TimedOut,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending | JobStatus::InProgress)
    }
}

impl From<InvocationStatus> for JobStatus {
    fn from(status: InvocationStatus) -> Self {
        match status {
            InvocationStatus::Pending => JobStatus::Pending,
            InvocationStatus::InProgress => JobStatus::InProgress,
            InvocationStatus::Success => JobStatus::Success,
            InvocationStatus::Failed => JobStatus::Failed,
            InvocationStatus::Cancelled => JobStatus::Cancelled,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "Pending"),
            JobStatus::InProgress => write!(f, "InProgress"),
            JobStatus::Success => write!(f, "Success"),
            JobStatus::Failed => write!(f, "Failed"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
            JobStatus::TimedOut => write!(f, "TimedOut"),
        }
    }
}

/// Captured output of a finished job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Terminal outcome of awaiting a job
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub handle: JobHandle,
    pub status: JobStatus,
    /// Number of status queries issued
    pub attempts: u32,
    /// Present only for statuses reported by the remote side
    pub output: Option<JobOutput>,
}

impl JobResult {
    pub(crate) fn finished(
        handle: JobHandle,
        status: JobStatus,
        attempts: u32,
        output: JobOutput,
    ) -> Self {
        Self {
            handle,
            status,
            attempts,
            output: Some(output),
        }
    }

    pub(crate) fn timed_out(handle: JobHandle, attempts: u32) -> Self {
        Self {
            handle,
            status: JobStatus::TimedOut,
            attempts,
            output: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }

    pub fn is_timed_out(&self) -> bool {
        self.status == JobStatus::TimedOut
    }
}
