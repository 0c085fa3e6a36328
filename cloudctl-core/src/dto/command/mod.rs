//! Remote command DTOs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request to run an execution document on instances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCommandRequest {
    pub instance_ids: Vec<String>,
    pub document_name: String,
    pub parameters: HashMap<String, Vec<String>>,
}

/// Response of a send-command request
///
/// `command` is absent when the control-plane accepted the request but did
/// not create a command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCommandResponse {
    pub command: Option<CommandSummary>,
}

/// Identifier of a submitted command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSummary {
    pub command_id: String,
    pub document_name: String,
    pub instance_ids: Vec<String>,
}
