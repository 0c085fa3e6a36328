//! Remote command domain types
//!
//! A command is sent to one or more instances through an execution document;
//! each (command, instance) pair becomes an invocation whose status is polled
//! until it finishes.

use serde::{Deserialize, Serialize};

/// Execution document that runs shell commands on the target
pub const RUN_SHELL_SCRIPT_DOCUMENT: &str = "AWS-RunShellScript";

/// Parameter key holding the list of shell commands
pub const COMMANDS_PARAMETER: &str = "commands";

/// Status of a command invocation as reported by the control-plane
///
/// There is no timed-out variant: the control-plane never reports one.
/// Local timeouts are a poller concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationStatus {
    Pending,
    InProgress,
    Success,
    Failed,
    Cancelled,
}

impl InvocationStatus {
    /// Whether the invocation has finished and will not change again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvocationStatus::Success | InvocationStatus::Failed | InvocationStatus::Cancelled
        )
    }
}

impl std::fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvocationStatus::Pending => write!(f, "Pending"),
            InvocationStatus::InProgress => write!(f, "InProgress"),
            InvocationStatus::Success => write!(f, "Success"),
            InvocationStatus::Failed => write!(f, "Failed"),
            InvocationStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// One command's execution on one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub command_id: String,
    pub instance_id: String,
    pub status: InvocationStatus,
    #[serde(default)]
    pub standard_output_content: String,
    #[serde(default)]
    pub standard_error_content: String,
}
