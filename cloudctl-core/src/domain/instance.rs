//! Compute instance domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tag key used for an instance's display name
pub const NAME_TAG: &str = "Name";

/// A compute instance managed by the control-plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub instance_id: String,
    pub state: InstanceState,
    pub instance_type: String,
    pub image_id: String,
    pub public_dns_name: Option<String>,
    pub key_name: Option<String>,
    pub launch_time: DateTime<Utc>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Instance {
    /// Value of the `Name` tag, if any
    pub fn name(&self) -> Option<&str> {
        self.tags.get(NAME_TAG).map(String::as_str)
    }
}

/// Lifecycle state of an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
}

impl InstanceState {
    /// Whether remote commands can be delivered to an instance in this state
    pub fn accepts_commands(&self) -> bool {
        matches!(self, InstanceState::Running)
    }
}

impl std::fmt::Display for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceState::Pending => write!(f, "pending"),
            InstanceState::Running => write!(f, "running"),
            InstanceState::ShuttingDown => write!(f, "shutting-down"),
            InstanceState::Terminated => write!(f, "terminated"),
            InstanceState::Stopping => write!(f, "stopping"),
            InstanceState::Stopped => write!(f, "stopped"),
        }
    }
}

/// State transition reported by start/stop operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceStateChange {
    pub instance_id: String,
    pub previous_state: InstanceState,
    pub current_state: InstanceState,
}
